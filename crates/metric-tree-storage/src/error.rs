//! Error types for corpus storage operations.

use metric_tree_core::CoreError;
use thiserror::Error;

use crate::qdrant::QdrantClientError;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded as a JSONL line.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record rejected before it reached disk.
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// Blocking task was cancelled or panicked.
    #[error("Storage task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Qdrant(#[from] QdrantClientError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<StorageError> for CoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Core(inner) => inner,
            StorageError::Qdrant(inner) => CoreError::BackendUnavailable(inner.to_string()),
            StorageError::InvalidRecord { id, reason } => {
                CoreError::validation("records", format!("{}: {}", id, reason))
            }
            other => CoreError::StorageError(other.to_string()),
        }
    }
}
