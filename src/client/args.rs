//! Command arguments
//!
//! Argument shapes shared by the command table.

use crate::error::{GredisError, Result};

/// A sequence holding at least one element
///
/// Used wherever a command needs one or more keys, fields or values.
/// A single element converts with `.into()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<T> {
    head: T,
    tail: Vec<T>,
}

impl<T> NonEmpty<T> {
    pub fn new(head: T) -> Self {
        Self {
            head,
            tail: Vec::new(),
        }
    }

    /// First element plus any number of further elements
    pub fn from_parts(head: T, tail: Vec<T>) -> Self {
        Self { head, tail }
    }

    /// Fails with [`GredisError::EmptyArguments`] on an empty vector
    pub fn from_vec(mut items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(GredisError::EmptyArguments);
        }
        let tail = items.split_off(1);
        let head = items.remove(0);
        Ok(Self { head, tail })
    }

    pub fn push(&mut self, item: T) {
        self.tail.push(item);
    }

    pub fn first(&self) -> &T {
        &self.head
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }
}

impl<T> From<T> for NonEmpty<T> {
    fn from(head: T) -> Self {
        NonEmpty::new(head)
    }
}

/// Where LINSERT places the new element relative to the pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

impl InsertPosition {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InsertPosition::Before => "BEFORE",
            InsertPosition::After => "AFTER",
        }
    }
}

impl AsRef<[u8]> for InsertPosition {
    fn as_ref(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

/// `prefix` followed by every element of `rest`, as wire arguments
pub(crate) fn with_prefix<'a, T: AsRef<[u8]>>(
    prefix: &[&'a [u8]],
    rest: &'a NonEmpty<T>,
) -> Vec<&'a [u8]> {
    let mut args = Vec::with_capacity(prefix.len() + rest.len());
    args.extend_from_slice(prefix);
    args.extend(rest.iter().map(|item| item.as_ref()));
    args
}
