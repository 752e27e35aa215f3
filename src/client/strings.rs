//! String commands

use crate::error::Result;
use crate::network::Stream;
use crate::protocol::{BulkValue, CommandName};

use super::args::{with_prefix, NonEmpty};
use super::Client;

impl<S: Stream> Client<S> {
    /// Set `key` to hold `value`, overwriting any previous value and TTL
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<bool> {
        self.execute(CommandName::Set, &[key.as_ref(), value.as_ref()])?;
        Ok(true)
    }

    /// Value of `key`, or `None` when the key does not exist
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.execute(CommandName::Get, &[key.as_ref()])?.into_bulk()
    }

    /// Remove keys; returns how many were removed
    pub fn del<K: AsRef<[u8]>>(&self, keys: NonEmpty<K>) -> Result<i64> {
        let args = with_prefix(&[], &keys);
        self.execute(CommandName::Del, &args)?.into_integer()
    }
}
