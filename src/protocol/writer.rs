//! Command writer
//!
//! Buffers encoded commands and pushes them to the transport on flush.

use std::io::Write;

use bytes::BytesMut;

use crate::error::Result;
use super::codec::encode_command;
use super::{Protocol, Tap};

/// Buffered command encoder bound to the write side of a transport
pub struct Writer<W: Write> {
    inner: Tap<W>,
    buf: BytesMut,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W, protocol: &'static Protocol) -> Self {
        Self {
            inner: Tap::new(inner, protocol.traces()),
            buf: BytesMut::with_capacity(256),
        }
    }

    /// Encode a command into the buffer; nothing is sent yet
    pub fn write_command(&mut self, command: &[u8], args: &[&[u8]]) -> Result<()> {
        encode_command(command, args, &mut self.buf);
        Ok(())
    }

    /// Send everything buffered so far
    ///
    /// The buffer is emptied whether or not the write succeeds.
    pub fn flush(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            self.inner.flush()?;
            return Ok(());
        }

        let pending = self.buf.split();
        self.inner.write_all(&pending)?;
        self.inner.flush()?;
        Ok(())
    }

    /// Number of encoded bytes waiting for a flush
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }
}
