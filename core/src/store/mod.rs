//! Ordered key-value storage
//!
//! The registry keeps all of its state in a single byte-ordered key space
//! behind the [`KvStore`] trait. Hosts with their own persistent store
//! implement the trait; [`MemStore`] is the in-memory implementation used by
//! tests and embedders without one. Mutations always run inside a
//! [`Context`], which buffers writes until [`transact`] commits them.

mod codec;
mod context;

use std::collections::BTreeMap;
use std::ops::Bound;

pub use codec::{load, read_u128, read_u64, save, write_u128, write_u64};
pub use context::{transact, transact_into, Committed, Context};

use crate::keys;

/// A key and its value
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Iterator over entries in ascending key order
pub type KvIter<'a> = Box<dyn Iterator<Item = KvPair> + 'a>;

/// Ordered byte key-value store
pub trait KvStore {
    /// Value stored under `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Whether `key` holds a value
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    /// Remove `key`; removing a missing key is a no-op
    fn delete(&mut self, key: &[u8]);

    /// Entries with `start <= key < end` in ascending byte order. An `end` of
    /// `None` is unbounded.
    fn range<'a>(&'a self, start: &[u8], end: Option<&[u8]>) -> KvIter<'a>;

    /// Entries whose key starts with `prefix`
    fn prefix<'a>(&'a self, prefix: &[u8]) -> KvIter<'a> {
        let end = keys::prefix_end(prefix);
        self.range(prefix, end.as_deref())
    }
}

/// `BTreeMap` backed store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn range<'a>(&'a self, start: &[u8], end: Option<&[u8]>) -> KvIter<'a> {
        if matches!(end, Some(end) if end <= start) {
            return Box::new(std::iter::empty());
        }
        let upper = match end {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        Box::new(
            self.entries
                .range::<[u8], _>((Bound::Included(start), upper))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }
}
