//! Session
//!
//! One connection to the server, driven strictly request/reply.
//!
//! ## Lifecycle
//! 1. Dial the transport within the connect timeout
//! 2. Bind a reader and a writer to it
//! 3. AUTH when a password is configured, SELECT when the db is non-zero
//! 4. Serve `execute` round trips until `close`
//!
//! A failed handshake closes the transport before the error is returned.
//!
//! ## Deadlines
//! A non-zero timeout is armed right before the I/O call and cleared right
//! after it, whatever the outcome. A zero timeout arms nothing.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Options;
use crate::error::{GredisError, Result};
use crate::protocol::{CommandName, Message, Protocol, Reader, Writer};

use super::stream::{connect, Stream};

/// A connected, handshaken session
///
/// Methods take `&mut self`, so one session never has two commands in
/// flight. Share it across threads through [`crate::Client`].
pub struct Session<S: Stream = TcpStream> {
    /// Resolved options, shared read-only
    options: Arc<Options>,

    /// Control handle used for deadlines and shutdown
    stream: S,

    /// Decodes replies from the read side
    reader: Reader<S>,

    /// Buffers commands for the write side
    writer: Writer<S>,
}

impl Session<TcpStream> {
    /// Connect over TCP and run the handshake
    pub fn dial(options: Arc<Options>) -> Result<Self> {
        tracing::debug!("Dialing {}", options.address());
        let stream = connect(&options)?;
        Self::establish(stream, options)
    }
}

impl<S: Stream> Session<S> {
    /// Bind a session to an already connected stream and run the handshake
    pub fn establish(stream: S, options: Arc<Options>) -> Result<Self> {
        let protocol = Protocol::select(options.trace_protocol);
        let reader = Reader::new(stream.try_clone()?, protocol);
        let writer = Writer::new(stream.try_clone()?, protocol);

        let mut session = Self {
            options,
            stream,
            reader,
            writer,
        };

        if let Err(e) = session.handshake() {
            tracing::debug!("Handshake with {} failed: {}", session.options.address(), e);
            session.close();
            return Err(e);
        }

        tracing::debug!(
            "Session ready on {} (db {})",
            session.options.address(),
            session.options.db
        );
        Ok(session)
    }

    fn handshake(&mut self) -> Result<()> {
        let options = Arc::clone(&self.options);

        if !options.password.is_empty() {
            self.execute(CommandName::Auth, &[options.password.as_bytes()])?;
        }

        if options.db != 0 {
            let db = options.db.to_string();
            self.execute(CommandName::Select, &[db.as_bytes()])?;
        }

        Ok(())
    }

    // =========================================================================
    // Request / Reply
    // =========================================================================

    /// Encode a command and flush it under the write deadline
    ///
    /// After a failure the stream is out of step with the server and the
    /// session should be closed.
    pub fn send(&mut self, command: impl AsRef<[u8]>, args: &[&[u8]]) -> Result<()> {
        let command = command.as_ref();
        tracing::trace!(
            "Sending {} with {} args",
            String::from_utf8_lossy(command),
            args.len()
        );
        self.writer.write_command(command, args)?;
        self.flush()
    }

    /// Push buffered commands to the server under the write deadline
    pub fn flush(&mut self) -> Result<()> {
        let writer = &mut self.writer;
        with_deadline(
            &self.stream,
            Direction::Write,
            self.options.write_timeout,
            || writer.flush(),
        )
    }

    /// Read one reply under the read deadline
    ///
    /// An error reply is returned as [`GredisError::Server`], never as a
    /// message.
    pub fn receive(&mut self) -> Result<Message> {
        let reader = &mut self.reader;
        let message = with_deadline(
            &self.stream,
            Direction::Read,
            self.options.read_timeout,
            || reader.read(),
        )?;

        match message {
            Message::Error(text) => Err(GredisError::Server(text)),
            message => Ok(message),
        }
    }

    /// One full round trip: `send` then `receive`
    pub fn execute(&mut self, command: impl AsRef<[u8]>, args: &[&[u8]]) -> Result<Message> {
        self.send(command, args)?;
        self.receive()
    }

    // =========================================================================
    // Accessors / Lifecycle
    // =========================================================================

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Shared handle to the options
    pub fn options_arc(&self) -> Arc<Options> {
        Arc::clone(&self.options)
    }

    /// Flush pending writes, then release the transport
    ///
    /// Never fails: the transport may already be gone (e.g. after
    /// SHUTDOWN), so failures are only logged.
    pub fn close(mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Flush on close of {} failed: {}", self.options.address(), e);
        }
        if let Err(e) = self.stream.shutdown() {
            tracing::debug!("Shutdown of {} failed: {}", self.options.address(), e);
        }
        tracing::debug!("Session to {} closed", self.options.address());
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Read,
    Write,
}

fn set_deadline<S: Stream>(
    stream: &S,
    direction: Direction,
    timeout: Option<Duration>,
) -> std::io::Result<()> {
    match direction {
        Direction::Read => stream.set_read_timeout(timeout),
        Direction::Write => stream.set_write_timeout(timeout),
    }
}

/// Run `op` with a deadline armed for its duration only
fn with_deadline<S: Stream, T>(
    stream: &S,
    direction: Direction,
    timeout: Duration,
    op: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if timeout.is_zero() {
        return op();
    }

    set_deadline(stream, direction, Some(timeout))?;
    let result = op();
    let cleared = set_deadline(stream, direction, None);

    let value = result?;
    cleared?;
    Ok(value)
}
