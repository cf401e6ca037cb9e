//! In-memory record store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_types::Record;

use super::{RecordStore, StoreError};

/// Records held in a `Vec` behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Record>>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Record>>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.read()?.clone())
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        self.write()?.push(record);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.write()?.clear();
        Ok(())
    }
}
