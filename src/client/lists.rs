//! List commands
//!
//! Indices are signed; negative values count from the tail (-1 is the last
//! element). They are sent as decimal text and interpreted by the server.

use crate::error::Result;
use crate::network::Stream;
use crate::protocol::{BulkValue, CommandName};

use super::args::{with_prefix, InsertPosition, NonEmpty};
use super::Client;

impl<S: Stream> Client<S> {
    /// Insert values at the head, one after another
    ///
    /// Pushing `a, b, c` leaves `c, b, a`. Returns the new length.
    pub fn lpush<V: AsRef<[u8]>>(
        &self,
        key: impl AsRef<[u8]>,
        values: NonEmpty<V>,
    ) -> Result<i64> {
        let args = with_prefix(&[key.as_ref()], &values);
        self.execute(CommandName::LPush, &args)?.into_integer()
    }

    /// Append values at the tail in the given order; returns the new length
    pub fn rpush<V: AsRef<[u8]>>(
        &self,
        key: impl AsRef<[u8]>,
        values: NonEmpty<V>,
    ) -> Result<i64> {
        let args = with_prefix(&[key.as_ref()], &values);
        self.execute(CommandName::RPush, &args)?.into_integer()
    }

    /// Remove and return the first element
    pub fn lpop(&self, key: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.execute(CommandName::LPop, &[key.as_ref()])?.into_bulk()
    }

    /// Remove and return the last element
    pub fn rpop(&self, key: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.execute(CommandName::RPop, &[key.as_ref()])?.into_bulk()
    }

    /// Length of the list (0 when missing)
    pub fn llen(&self, key: impl AsRef<[u8]>) -> Result<i64> {
        self.execute(CommandName::LLen, &[key.as_ref()])?.into_integer()
    }

    /// Insert `value` before or after the first occurrence of `pivot`
    ///
    /// Returns the new length; the server reports a missing pivot as -1.
    pub fn linsert(
        &self,
        key: impl AsRef<[u8]>,
        position: InsertPosition,
        pivot: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<i64> {
        self.execute(
            CommandName::LInsert,
            &[key.as_ref(), position.as_ref(), pivot.as_ref(), value.as_ref()],
        )?
        .into_integer()
    }

    /// Element at `index`
    pub fn lindex(&self, key: impl AsRef<[u8]>, index: i64) -> Result<BulkValue> {
        let index = index.to_string();
        self.execute(CommandName::LIndex, &[key.as_ref(), index.as_bytes()])?
            .into_bulk()
    }

    /// Elements from `start` to `stop`, both inclusive
    pub fn lrange(&self, key: impl AsRef<[u8]>, start: i64, stop: i64) -> Result<Vec<BulkValue>> {
        let start = start.to_string();
        let stop = stop.to_string();
        self.execute(
            CommandName::LRange,
            &[key.as_ref(), start.as_bytes(), stop.as_bytes()],
        )?
        .into_bulk_array()
    }
}
