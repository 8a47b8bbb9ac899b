//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction could not be started, committed or rolled back.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write was attempted on a read-only transaction.
    #[error("write attempted on a read-only transaction")]
    ReadOnly,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend-level failure that does not fit the other variants.
    #[error("storage backend error: {0}")]
    Internal(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
