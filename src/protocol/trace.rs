//! Wire tap
//!
//! Transparent `Read`/`Write` wrapper that reports raw traffic through
//! `tracing` when enabled. Bytes pass through unchanged either way.

use std::io::{self, Read, Write};

/// Target used for wire events, e.g. `RUST_LOG=gredis::wire=debug`
pub const WIRE_TARGET: &str = "gredis::wire";

/// Pass-through I/O wrapper with optional traffic reporting
pub struct Tap<S> {
    inner: S,
    enabled: bool,
}

impl<S> Tap<S> {
    pub fn new(inner: S, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S: Read> Read for Tap<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if self.enabled && n > 0 {
            tracing::debug!(target: WIRE_TARGET, "<- {}", buf[..n].escape_ascii());
        }
        Ok(n)
    }
}

impl<S: Write> Write for Tap<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if self.enabled && n > 0 {
            tracing::debug!(target: WIRE_TARGET, "-> {}", buf[..n].escape_ascii());
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
