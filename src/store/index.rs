//! In-memory object index.
//!
//! Maps an [`ImageId`] to its [`ImageRecord`] using `DashMap` for sharded,
//! concurrent access. Membership alone defines liveness: nothing here looks
//! at `expires_at`, removal is driven by the eviction scheduler.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::types::{ImageId, ImageRecord};
use crate::error::{Result, StoreError};

/// Concurrent index of live images.
///
/// Every operation is a short in-memory critical section on one shard.
/// Shard guards never escape a method, so no caller can hold one across I/O.
#[derive(Debug, Default)]
pub struct ImageIndex {
    records: DashMap<ImageId, ImageRecord>,
}

impl ImageIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id is already present. The
    /// existing entry is not modified.
    pub fn insert(&self, record: ImageRecord) -> Result<()> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            },
        }
    }

    /// Returns a copy of the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is not indexed.
    pub fn get(&self, id: &ImageId) -> Result<ImageRecord> {
        self.records
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Removes the entry for `id`, returning whether it was present.
    ///
    /// Idempotent: a second call returns `false`.
    pub fn remove(&self, id: &ImageId) -> bool {
        self.records.remove(id).is_some()
    }

    /// Returns true if `id` is indexed.
    pub fn contains(&self, id: &ImageId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no entries are live.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
