//! Protocol codec
//!
//! Encoding of commands and decoding of replies.
//!
//! ## Command Format
//! ```text
//! ┌──────────────┬──────────────────────────────────────────┐
//! │ *<argc>\r\n  │ $<len>\r\n<bytes>\r\n  (repeated argc)   │
//! └──────────────┴──────────────────────────────────────────┘
//! ```
//! The command keyword is the first bulk string.
//!
//! ## Reply Format
//! One type byte, a CRLF-terminated header line, and for bulk strings the
//! payload followed by CRLF. Arrays nest further replies.

use std::io::BufRead;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{GredisError, Result};
use super::Message;

/// Largest bulk payload accepted from the server (512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Deepest array nesting accepted in one reply
pub const MAX_NESTING: usize = 512;

// =============================================================================
// Command Encoding
// =============================================================================

/// Append one command as an array of bulk strings to `out`
pub fn encode_command(command: &[u8], args: &[&[u8]], out: &mut BytesMut) {
    let argc = args.len() + 1;
    out.reserve(16 + command.len() + args.iter().map(|a| a.len() + 16).sum::<usize>());

    out.put_u8(b'*');
    out.put_slice(argc.to_string().as_bytes());
    out.put_slice(b"\r\n");

    put_bulk(out, command);
    for arg in args {
        put_bulk(out, arg);
    }
}

fn put_bulk(out: &mut BytesMut, data: &[u8]) {
    out.put_u8(b'$');
    out.put_slice(data.len().to_string().as_bytes());
    out.put_slice(b"\r\n");
    out.put_slice(data);
    out.put_slice(b"\r\n");
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read exactly one reply from the buffered reader
///
/// `line` is scratch space reused across calls. Arrays nested deeper than
/// [`MAX_NESTING`] are rejected as a protocol error.
pub fn read_message<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    max_bulk_len: usize,
) -> Result<Message> {
    read_nested(reader, line, max_bulk_len, 0)
}

fn read_nested<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    max_bulk_len: usize,
    depth: usize,
) -> Result<Message> {
    read_line(reader, line)?;
    if line.is_empty() {
        return Err(GredisError::Protocol("empty reply line".to_string()));
    }

    let payload = &line[1..];
    match line[0] {
        b'+' => Ok(Message::Status(String::from_utf8_lossy(payload).into_owned())),
        b'-' => Ok(Message::Error(String::from_utf8_lossy(payload).into_owned())),
        b':' => Ok(Message::Integer(parse_i64(payload)?)),
        b'$' => {
            let len = parse_i64(payload)?;
            read_bulk(reader, len, max_bulk_len)
        }
        b'*' => {
            let len = parse_i64(payload)?;
            read_array(reader, len, line, max_bulk_len, depth + 1)
        }
        other => Err(GredisError::Protocol(format!(
            "unknown reply type byte: 0x{:02x}",
            other
        ))),
    }
}

fn read_bulk<R: BufRead>(reader: &mut R, len: i64, max_bulk_len: usize) -> Result<Message> {
    if len < 0 {
        return Ok(Message::Nil);
    }

    let len = len as usize;
    if len > max_bulk_len {
        return Err(GredisError::Protocol(format!(
            "bulk payload too large: {} bytes (max {})",
            len, max_bulk_len
        )));
    }

    // Payload plus trailing CRLF in one read.
    let mut data = vec![0u8; len + 2];
    reader.read_exact(&mut data)?;
    if &data[len..] != b"\r\n" {
        return Err(GredisError::Protocol(
            "bulk payload not terminated by CRLF".to_string(),
        ));
    }
    data.truncate(len);

    Ok(Message::Bulk(Bytes::from(data)))
}

fn read_array<R: BufRead>(
    reader: &mut R,
    len: i64,
    line: &mut Vec<u8>,
    max_bulk_len: usize,
    depth: usize,
) -> Result<Message> {
    if len < 0 {
        return Ok(Message::Nil);
    }
    if depth > MAX_NESTING {
        return Err(GredisError::Protocol("reply nesting too deep".to_string()));
    }

    // Cap the preallocation; the length is untrusted input.
    let mut items = Vec::with_capacity((len as usize).min(1024));
    for _ in 0..len {
        items.push(read_nested(reader, line, max_bulk_len, depth)?);
    }
    Ok(Message::Array(items))
}

fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<()> {
    buf.clear();
    let bytes = reader.read_until(b'\n', buf)?;
    if bytes == 0 {
        return Err(GredisError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed by server",
        )));
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(GredisError::Protocol(
            "reply line not terminated by CRLF".to_string(),
        ));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(data: &[u8]) -> Result<i64> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| {
            GredisError::Protocol(format!(
                "invalid integer: {:?}",
                String::from_utf8_lossy(data)
            ))
        })
}
