//! Reply definitions
//!
//! One decoded server reply and its projections into command results.

use bytes::Bytes;

use crate::error::{GredisError, Result};

/// A bulk reply: the payload, or `None` when the server answered nil.
///
/// A missing key and an empty string are different values here.
pub type BulkValue = Option<Bytes>;

/// A decoded server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `+OK` style status line
    Status(String),

    /// `-ERR ...` error reply
    Error(String),

    /// `:42` integer reply
    Integer(i64),

    /// `$n` bulk string
    Bulk(Bytes),

    /// `*n` array
    Array(Vec<Message>),

    /// `$-1` or `*-1`
    Nil,
}

impl Message {
    pub fn is_error(&self) -> bool {
        matches!(self, Message::Error(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Message::Nil)
    }

    /// Short name of the reply kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Status(_) => "status",
            Message::Error(_) => "error",
            Message::Integer(_) => "integer",
            Message::Bulk(_) => "bulk",
            Message::Array(_) => "array",
            Message::Nil => "nil",
        }
    }

    /// Integer payload, if this is an integer reply
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Message::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Project an integer reply (counts, lengths, 0/1 flags)
    pub fn into_integer(self) -> Result<i64> {
        match self {
            Message::Integer(value) => Ok(value),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Project a bulk reply, keeping nil distinct from empty
    ///
    /// Status lines are accepted as present values.
    pub fn into_bulk(self) -> Result<BulkValue> {
        match self {
            Message::Bulk(data) => Ok(Some(data)),
            Message::Status(text) => Ok(Some(Bytes::from(text))),
            Message::Nil => Ok(None),
            other => Err(other.mismatch("bulk")),
        }
    }

    /// Project a status or bulk reply as text
    pub fn into_text(self) -> Result<String> {
        match self {
            Message::Status(text) => Ok(text),
            Message::Bulk(data) => Ok(String::from_utf8_lossy(&data).into_owned()),
            other => Err(other.mismatch("status")),
        }
    }

    /// Project an array reply, each element through [`Message::into_bulk`]
    ///
    /// A nil array projects to an empty list.
    pub fn into_bulk_array(self) -> Result<Vec<BulkValue>> {
        match self {
            Message::Array(items) => items.into_iter().map(Message::into_bulk).collect(),
            Message::Nil => Ok(Vec::new()),
            other => Err(other.mismatch("array")),
        }
    }

    fn mismatch(self, expected: &'static str) -> GredisError {
        match self {
            Message::Error(message) => GredisError::Server(message),
            other => GredisError::UnexpectedReply {
                expected,
                found: other.kind(),
            },
        }
    }
}
