//! Error types for generation and scheduling.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced to callers of the batch entry point.
#[derive(Debug, Error)]
pub enum Error {
    /// The starting snapshot could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An insert failed part way through a batch.
    ///
    /// Records inserted before the failure stay in the store.
    #[error("batch aborted after {inserted} record(s): {source}")]
    BatchAborted {
        inserted: usize,
        #[source]
        source: StoreError,
    },
}

impl Error {
    /// Records that reached the store before the failure.
    pub fn inserted(&self) -> usize {
        match self {
            Self::Store(_) => 0,
            Self::BatchAborted { inserted, .. } => *inserted,
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;
