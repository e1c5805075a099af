//! Error types for metric-tree-core.
//!
//! This module defines the central error type [`CoreError`] used throughout
//! the metric-tree-core crate, along with the [`CoreResult<T>`] type alias.
//!
//! # Examples
//!
//! ```rust
//! use metric_tree_core::CoreError;
//!
//! fn require_children(count: usize) -> Result<(), CoreError> {
//!     if count == 0 {
//!         return Err(CoreError::validation("children", "children cannot be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_children(0).is_err());
//! ```

use thiserror::Error;

/// Top-level error type for metric-tree-core operations.
///
/// Numerical degeneracies (singular design matrices, zero-sum weights, zero
/// vectors) are never represented here. They are absorbed by the kernels and
/// reported as advisory notes instead.
///
/// # Examples
///
/// ```rust
/// use metric_tree_core::CoreError;
///
/// let error = CoreError::DimensionMismatch {
///     expected: 384,
///     actual: 768,
/// };
///
/// match &error {
///     CoreError::DimensionMismatch { expected, actual } => {
///         assert_eq!(*expected, 384);
///         assert_eq!(*actual, 768);
///     }
///     _ => panic!("unexpected variant"),
/// }
///
/// assert!(error.to_string().contains("384"));
/// ```
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or inconsistent caller input.
    ///
    /// # When This Occurs
    ///
    /// - Empty child set or mismatched series lengths for elasticity estimation
    /// - Missing node name in an explain request
    /// - Unknown stage label
    ///
    /// Surfaced directly to the caller and never retried.
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Embedding vector dimension does not match expected size.
    ///
    /// # When This Occurs
    ///
    /// - An embedding service returns vectors of a different width than configured
    /// - Mixing corpora embedded by different models
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension (typically 384)
        expected: usize,
        /// Actual embedding dimension provided
        actual: usize,
    },

    /// An error occurred while reading or writing the corpus.
    ///
    /// # When This Occurs
    ///
    /// - The JSONL store cannot be opened or appended to
    /// - Disk space exhaustion
    #[error("Storage error: {0}")]
    StorageError(String),

    /// An external retrieval index could not serve the request.
    ///
    /// Backends catch this and degrade to the local ranking path; it only
    /// reaches callers when no fallback exists.
    #[error("Retrieval backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Configuration is invalid or missing.
    ///
    /// # When This Occurs
    ///
    /// - Invalid configuration value format
    /// - Unknown provider name
    /// - Environment variable parsing failure
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The embedding capability failed or is not ready.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::ValidationError`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message suitable for a client-facing error payload.
    ///
    /// Validation failures return only the message, matching the wording
    /// callers see for rejected requests.
    pub fn client_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
