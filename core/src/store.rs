//! # Header Store
//!
//! The forest of accepted headers, keyed by block hash. Records are only ever
//! added: there is no update or delete path.
//!
//! Backends provide raw key-value access through [`HeaderStore::get`],
//! [`HeaderStore::put`] and [`HeaderStore::contains`]. The insertion rules
//! live in the provided [`HeaderStore::insert`] so every backend enforces
//! them the same way.

use header_chain::{HeaderError, HeaderHash, HeaderRecord};
use std::collections::HashMap;

pub trait HeaderStore {
    /// Returns the record stored at `hash`, if any.
    fn get(&self, hash: &HeaderHash) -> Option<HeaderRecord>;

    /// Writes a record without any checks. Only called by [`HeaderStore::insert`].
    fn put(&mut self, record: HeaderRecord);

    fn contains(&self, hash: &HeaderHash) -> bool {
        self.get(hash).is_some()
    }

    fn is_empty(&self) -> bool;

    /// Stores `record` if its hash is new and its parent is already stored.
    ///
    /// # Errors
    ///
    /// - [`HeaderError::DuplicateHeader`] if a record exists at `record.hash`
    /// - [`HeaderError::UnknownParent`] if `record.prev_hash` is not stored
    fn insert(&mut self, record: HeaderRecord) -> Result<(), HeaderError> {
        if self.contains(&record.hash) {
            return Err(HeaderError::DuplicateHeader(record.hash));
        }
        if !self.contains(&record.prev_hash) {
            return Err(HeaderError::UnknownParent(record.prev_hash));
        }

        self.put(record);
        Ok(())
    }
}

/// In-memory [`HeaderStore`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryHeaderStore {
    records: HashMap<HeaderHash, HeaderRecord>,
}

impl MemoryHeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl HeaderStore for MemoryHeaderStore {
    fn get(&self, hash: &HeaderHash) -> Option<HeaderRecord> {
        self.records.get(hash).cloned()
    }

    fn put(&mut self, record: HeaderRecord) {
        self.records.insert(record.hash, record);
    }

    fn contains(&self, hash: &HeaderHash) -> bool {
        self.records.contains_key(hash)
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
