//! Transport stream
//!
//! The capability a session needs from its transport, and TCP dialing.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Options;
use crate::error::Result;

/// Byte stream a session can drive
///
/// Clones share the same underlying connection; deadlines set through
/// any handle apply to all of them.
pub trait Stream: Read + Write + Send + Sized {
    /// Another handle to the same connection
    fn try_clone(&self) -> io::Result<Self>;

    /// Arm (`Some`) or clear (`None`) the read deadline
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;

    /// Arm (`Some`) or clear (`None`) the write deadline
    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;

    /// Shut down both directions of the connection
    fn shutdown(&self) -> io::Result<()>;
}

impl Stream for TcpStream {
    fn try_clone(&self) -> io::Result<Self> {
        TcpStream::try_clone(self)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }

    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Open a TCP connection to the configured endpoint
///
/// Every resolved address is tried in order, each within the connect
/// timeout (a zero timeout leaves the limit to the OS). The last failure
/// is returned when none succeeds.
pub fn connect(options: &Options) -> Result<TcpStream> {
    let addrs = (options.host.as_str(), options.port).to_socket_addrs()?;

    let mut last_err = None;
    for addr in addrs {
        tracing::trace!("Connecting to {}", addr);
        let attempt = if options.connect_timeout.is_zero() {
            TcpStream::connect(addr)
        } else {
            TcpStream::connect_timeout(&addr, options.connect_timeout)
        };

        match attempt {
            Ok(stream) => {
                // Disable Nagle's algorithm for low latency
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    let err = last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("could not resolve {}", options.address()),
        )
    });
    Err(err.into())
}
