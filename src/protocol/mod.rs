//! Protocol Module
//!
//! RESP-style wire codec used by every session.
//!
//! ## Request Format
//! Every command is sent as an array of bulk strings:
//! ```text
//! *3\r\n $3\r\n SET\r\n $3\r\n key\r\n $5\r\n value\r\n
//! ```
//!
//! ## Reply Format
//! ```text
//! +OK\r\n                 status
//! -ERR message\r\n        error
//! :42\r\n                 integer
//! $5\r\nhello\r\n         bulk string ($-1 is nil)
//! *2\r\n...               array (*-1 is nil)
//! ```
//!
//! ## Protocol instances
//! Codec settings live in two process-wide immutable values,
//! [`DEFAULT_PROTOCOL`] and [`TRACE_PROTOCOL`]. Sessions borrow one of them
//! for their whole lifetime; nothing about them is ever mutated.

mod codec;
mod command;
mod message;
mod reader;
mod trace;
mod writer;

pub use codec::{encode_command, read_message, MAX_BULK_LEN, MAX_NESTING};
pub use command::CommandName;
pub use message::{BulkValue, Message};
pub use reader::Reader;
pub use trace::{Tap, WIRE_TARGET};
pub use writer::Writer;

/// Shared, read-only codec settings
#[derive(Debug)]
pub struct Protocol {
    trace: bool,
    max_bulk_len: usize,
}

/// Codec without wire tracing
pub static DEFAULT_PROTOCOL: Protocol = Protocol::new(false);

/// Codec that reports every raw chunk as a `gredis::wire` debug event
pub static TRACE_PROTOCOL: Protocol = Protocol::new(true);

impl Protocol {
    const fn new(trace: bool) -> Self {
        Self {
            trace,
            max_bulk_len: MAX_BULK_LEN,
        }
    }

    /// Pick the shared instance matching the tracing flag
    pub fn select(trace: bool) -> &'static Protocol {
        if trace {
            &TRACE_PROTOCOL
        } else {
            &DEFAULT_PROTOCOL
        }
    }

    /// Whether wire traffic is reported
    pub fn traces(&self) -> bool {
        self.trace
    }

    /// Largest bulk payload accepted from the server
    pub fn max_bulk_len(&self) -> usize {
        self.max_bulk_len
    }
}
