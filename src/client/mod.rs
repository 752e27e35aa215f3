//! Client Module
//!
//! Thread-safe facade over one [`Session`] plus the command table.
//!
//! ## Concurrency
//! The session sits behind a mutex. Every command holds the lock for its
//! whole send/receive pair, so replies can never be handed to the wrong
//! caller.
//!
//! ## Command table
//! - `basic`: connection, server and keyspace commands
//! - `strings`: SET / GET / DEL
//! - `hashes`: HSET / HGET / HDEL / HLEN / HEXISTS
//! - `lists`: LPUSH / RPUSH / LPOP / RPOP / LLEN / LINSERT / LINDEX / LRANGE

mod args;
mod basic;
mod hashes;
mod lists;
mod strings;

pub use args::{InsertPosition, NonEmpty};

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Options;
use crate::error::Result;
use crate::network::{Session, Stream};
use crate::protocol::Message;

/// Client for a gredis server
pub struct Client<S: Stream = TcpStream> {
    /// Read-only copy of the session's options
    options: Arc<Options>,

    /// The single connection; locked per round trip
    session: Mutex<Session<S>>,
}

impl Client<TcpStream> {
    /// Resolve a `gredis://` connection string and dial it
    pub fn connect(url: &str) -> Result<Self> {
        Self::dial(Options::from_url(url)?)
    }

    /// Dial with already resolved options
    pub fn dial(options: Options) -> Result<Self> {
        let session = Session::dial(Arc::new(options))?;
        Ok(Self::from_session(session))
    }
}

impl<S: Stream> Client<S> {
    /// Wrap an established session
    pub fn from_session(session: Session<S>) -> Self {
        Self {
            options: session.options_arc(),
            session: Mutex::new(session),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Lock the session for a manual send/flush/receive sequence
    ///
    /// Other callers block until the guard is dropped.
    pub fn session(&self) -> MutexGuard<'_, Session<S>> {
        self.session.lock()
    }

    /// One round trip of an arbitrary command
    pub fn execute(&self, command: impl AsRef<[u8]>, args: &[&[u8]]) -> Result<Message> {
        self.session.lock().execute(command, args)
    }

    /// Flush pending writes and release the connection
    pub fn close(self) {
        self.session.into_inner().close();
    }
}
