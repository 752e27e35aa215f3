//! Network Module
//!
//! Transport handling and the request/reply session.
//!
//! ## Architecture
//! - `Stream`: transport capability (byte I/O, deadlines, shutdown)
//! - `Session`: one stream, one reader, one writer, strictly half-duplex
//! - Every command is one `send` followed by one `receive`

mod session;
mod stream;

pub use session::Session;
pub use stream::{connect, Stream};
