//! Connection, server and keyspace commands

use crate::error::Result;
use crate::network::Stream;
use crate::protocol::{BulkValue, CommandName};

use super::args::{with_prefix, NonEmpty};
use super::Client;

impl<S: Stream> Client<S> {
    /// Authenticate against a password-protected server
    ///
    /// Any non-error reply counts as success.
    pub fn auth(&self, password: &str) -> Result<bool> {
        self.execute(CommandName::Auth, &[password.as_bytes()])?;
        Ok(true)
    }

    /// Switch to the database with the given zero-based index
    pub fn select(&self, db: u32) -> Result<bool> {
        let db = db.to_string();
        self.execute(CommandName::Select, &[db.as_bytes()])?;
        Ok(true)
    }

    /// Returns a copy of `message`
    pub fn echo(&self, message: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.execute(CommandName::Echo, &[message.as_ref()])?
            .into_bulk()
    }

    /// Returns `PONG`
    pub fn ping(&self) -> Result<String> {
        self.execute(CommandName::Ping, &[])?.into_text()
    }

    /// PING carrying a payload; the server answers with a copy of it
    ///
    /// Sent as ECHO, which the server always supports.
    pub fn ping_message(&self, message: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.echo(message)
    }

    /// Ask the server to shut down, then close the local side
    ///
    /// No reply is awaited; the server drops the connection.
    pub fn shutdown(self) -> Result<()> {
        let mut session = self.session.into_inner();
        let sent = session.send(CommandName::Shutdown, &[]);
        session.close();
        sent
    }

    /// Names of all commands the server supports
    pub fn commands(&self) -> Result<Vec<BulkValue>> {
        self.execute(CommandName::Commands, &[])?.into_bulk_array()
    }

    /// Keys matching `pattern`
    ///
    /// `pattern` is a regular expression, not a glob. An invalid expression
    /// comes back as a server error.
    pub fn keys(&self, pattern: &str) -> Result<Vec<BulkValue>> {
        self.execute(CommandName::Keys, &[pattern.as_bytes()])?
            .into_bulk_array()
    }

    /// Number of the given keys that exist
    ///
    /// A key named several times is counted several times.
    pub fn exists<K: AsRef<[u8]>>(&self, keys: NonEmpty<K>) -> Result<i64> {
        let args = with_prefix(&[], &keys);
        self.execute(CommandName::Exists, &args)?.into_integer()
    }

    /// Set a timeout on `key`
    ///
    /// 1 if the timeout was set, 0 if the key does not exist.
    pub fn expire(&self, key: impl AsRef<[u8]>, seconds: i64) -> Result<i64> {
        let seconds = seconds.to_string();
        self.execute(CommandName::Expire, &[key.as_ref(), seconds.as_bytes()])?
            .into_integer()
    }
}
