//! Hash commands

use crate::error::Result;
use crate::network::Stream;
use crate::protocol::{BulkValue, CommandName};

use super::args::{with_prefix, NonEmpty};
use super::Client;

impl<S: Stream> Client<S> {
    /// Set `field` in the hash at `key`
    ///
    /// 1 if the field is new, 0 if an existing value was overwritten.
    pub fn hset(
        &self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<i64> {
        self.execute(
            CommandName::HSet,
            &[key.as_ref(), field.as_ref(), value.as_ref()],
        )?
        .into_integer()
    }

    /// Value of `field` in the hash at `key`, `None` if absent
    pub fn hget(&self, key: impl AsRef<[u8]>, field: impl AsRef<[u8]>) -> Result<BulkValue> {
        self.execute(CommandName::HGet, &[key.as_ref(), field.as_ref()])?
            .into_bulk()
    }

    /// Remove fields from the hash at `key`; returns how many were removed
    pub fn hdel<F: AsRef<[u8]>>(
        &self,
        key: impl AsRef<[u8]>,
        fields: NonEmpty<F>,
    ) -> Result<i64> {
        let args = with_prefix(&[key.as_ref()], &fields);
        self.execute(CommandName::HDel, &args)?.into_integer()
    }

    /// Number of fields in the hash at `key` (0 when missing)
    pub fn hlen(&self, key: impl AsRef<[u8]>) -> Result<i64> {
        self.execute(CommandName::HLen, &[key.as_ref()])?
            .into_integer()
    }

    /// 1 if the hash at `key` contains `field`, otherwise 0
    pub fn hexists(&self, key: impl AsRef<[u8]>, field: impl AsRef<[u8]>) -> Result<i64> {
        self.execute(CommandName::HExists, &[key.as_ref(), field.as_ref()])?
            .into_integer()
    }
}
