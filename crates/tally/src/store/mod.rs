//! Record store abstraction.
//!
//! The generator only needs three operations from persistence: read every
//! record, append one, and wipe the collection at startup. Implementations
//! use interior mutability so one store can be shared behind an `Arc`
//! between the scheduler task and whoever reads snapshots.
//!
//! - [`MemoryStore`]: in-process `Vec`, for tests and ephemeral runs
//! - [`JsonlStore`]: append-only JSON-lines file

use std::path::PathBuf;
use std::sync::Arc;

use tally_types::Record;
use thiserror::Error;

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

/// Storage failures. None of them are retried by the generator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot serve requests right now.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// IO error on the backing file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored document could not be decoded.
    #[error("corrupt record at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence collaborator for generated records.
pub trait RecordStore: Send + Sync {
    /// Returns every stored record, active or not.
    fn fetch_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Appends one record. Not transactional across calls.
    fn insert(&self, record: Record) -> Result<(), StoreError>;

    /// Removes every record.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        (**self).fetch_all()
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        (**self).insert(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        (**self).fetch_all()
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        (**self).insert(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
