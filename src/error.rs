//! Error types for gredis
//!
//! Provides a unified error type for all client operations. Transport
//! failures and server-reported errors share one type; callers tell them
//! apart by variant, not by channel.

use thiserror::Error;

/// Result type alias using GredisError
pub type Result<T> = std::result::Result<T, GredisError>;

/// Unified error type for gredis operations
#[derive(Debug, Error)]
pub enum GredisError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Connect, read or write failure, including expired deadlines.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("invalid URL format")]
    InvalidUrl,

    #[error("invalid gredis URL scheme: {0}")]
    InvalidScheme(String),

    #[error("invalid database: {0}")]
    InvalidDatabase(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The reply stream could not be decoded.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server answered with an error reply.
    #[error("{0}")]
    Server(String),

    /// The reply decoded fine but has the wrong shape for the command.
    #[error("unexpected reply: expected {expected}, found {found}")]
    UnexpectedReply {
        expected: &'static str,
        found: &'static str,
    },

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("at least one argument is required")]
    EmptyArguments,
}

impl GredisError {
    /// True when a configured read or write deadline expired.
    ///
    /// Unix reports an expired socket timeout as `WouldBlock`, Windows as
    /// `TimedOut`.
    pub fn is_timeout(&self) -> bool {
        match self {
            GredisError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// True when the error was sent by the server as an error reply.
    pub fn is_server_error(&self) -> bool {
        matches!(self, GredisError::Server(_))
    }
}
