//! Error types for the vector engine.

use thiserror::Error;

use neardb_storage::StorageError;

/// Errors that can occur in vector engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No index with the given name exists.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// An index with the given name already exists.
    #[error("index already exists: {0}")]
    IndexAlreadyExists(String),

    /// An insert batch contained an id that is already stored.
    #[error("vector '{id}' already exists in index '{index}'")]
    VectorAlreadyExists {
        /// The index name.
        index: String,
        /// The conflicting vector id.
        id: String,
    },

    /// Invalid index name.
    #[error("invalid index name: {0}")]
    InvalidName(String),

    /// Invalid argument (bad dimensions, unknown metric, malformed vector).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A vector's length does not match the index dimensions.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The index dimensions.
        expected: usize,
        /// The offending vector length.
        actual: usize,
    },

    /// Encoding or decoding of a stored row failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
