//! Reply reader
//!
//! Buffered decoder bound to the read side of a transport.

use std::io::{BufReader, Read};

use crate::error::Result;
use super::codec::read_message;
use super::{Message, Protocol, Tap};

/// Reads replies one at a time from a transport
pub struct Reader<R: Read> {
    inner: BufReader<Tap<R>>,
    line: Vec<u8>,
    protocol: &'static Protocol,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R, protocol: &'static Protocol) -> Self {
        Self {
            inner: BufReader::new(Tap::new(inner, protocol.traces())),
            line: Vec::with_capacity(128),
            protocol,
        }
    }

    /// Read exactly one reply
    ///
    /// Error replies are returned as [`Message::Error`]; turning them into
    /// failures is the session's job.
    pub fn read(&mut self) -> Result<Message> {
        read_message(&mut self.inner, &mut self.line, self.protocol.max_bulk_len())
    }

    pub fn get_ref(&self) -> &R {
        self.inner.get_ref().get_ref()
    }
}
