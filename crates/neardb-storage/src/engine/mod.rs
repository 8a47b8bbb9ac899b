//! Storage engine traits and abstractions.
//!
//! This module defines the traits that storage backends implement:
//!
//! - [`StorageEngine`] - Entry point for creating transactions
//! - [`Transaction`] - ACID transaction with get/put/delete/scan operations
//! - [`Scan`] - Forward iteration over a key prefix
//!
//! All operations return [`StorageResult<T>`], an alias for
//! `Result<T, StorageError>`.

mod error;
mod traits;

pub use error::{StorageError, StorageResult};
pub use traits::{KeyValue, Scan, StorageEngine, Transaction};
