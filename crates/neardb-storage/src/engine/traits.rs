//! Core storage traits.
//!
//! The vector engine keeps its demands on the backing store deliberately
//! small: transactional point reads and writes over logical tables, plus
//! ordered forward scans over a key prefix. Backends that can serialize
//! concurrent writers (or lock at least per-key) satisfy the engine's
//! consistency requirements without any engine-side locking.

use std::sync::Arc;

use super::StorageError;

/// A key-value pair yielded by scan operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// A storage engine that provides transactional key-value operations.
///
/// Implementations must be thread-safe (`Send + Sync`). Transactions are
/// the only way to touch data; the engine itself only hands them out.
///
/// # Example
///
/// ```ignore
/// use neardb_storage::{StorageEngine, Transaction};
///
/// fn example<E: StorageEngine>(engine: &E) -> Result<(), StorageError> {
///     let mut tx = engine.begin_write()?;
///     tx.put("catalog", b"docs", b"...")?;
///     tx.commit()?;
///
///     let tx = engine.begin_read()?;
///     let value = tx.get("catalog", b"docs")?;
///     Ok(())
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions see a consistent snapshot of the database and may
    /// run concurrently with each other and with a writer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot start.
    fn begin_read(&self) -> Result<Self::Tx<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// Backends may serialize write transactions; callers must not assume
    /// two writers make progress concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot start.
    fn begin_write(&self) -> Result<Self::Tx<'_>, StorageError>;
}

/// A transaction providing atomic, isolated key-value operations.
///
/// Write transactions must be explicitly committed; dropping a transaction
/// without committing rolls back every change it staged. This is what makes
/// validate-then-write batches all-or-nothing for callers: an early error
/// return leaves nothing behind.
pub trait Transaction {
    /// The scan type for prefix iteration.
    type Scan<'a>: Scan
    where
        Self: 'a;

    /// Get a value by key from a logical table.
    ///
    /// Returns `Ok(None)` if the key (or the whole table) does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails at the backend level.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair into a logical table, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction, or a
    /// backend error if the write fails.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key from a logical table.
    ///
    /// Returns `Ok(true)` if the key existed, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction, or a
    /// backend error if the delete fails.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Scan all key-value pairs in a table whose key starts with `prefix`,
    /// in ascending key order.
    ///
    /// An empty prefix scans the whole table. Within a write transaction the
    /// scan observes the transaction's own uncommitted writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan cannot be set up.
    fn scan_prefix(&self, table: &str, prefix: &[u8]) -> Result<Self::Scan<'_>, StorageError>;

    /// Commit the transaction, making all staged changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails; the
    /// transaction is consumed either way.
    fn commit(self) -> Result<(), StorageError>;

    /// Roll back the transaction, discarding all staged changes.
    ///
    /// Dropping an uncommitted transaction has the same effect; this method
    /// exists for callers that want the rollback to be explicit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Check whether this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// Forward-only iteration over key-value pairs.
///
/// ```ignore
/// let mut scan = tx.scan_prefix("vectors", &prefix)?;
/// while let Some((key, value)) = scan.next()? {
///     // keys arrive in ascending order
/// }
/// ```
pub trait Scan {
    /// Advance to the next key-value pair.
    ///
    /// Returns `Ok(None)` once the prefix range is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn next(&mut self) -> Result<Option<KeyValue>, StorageError>;
}

/// Shared ownership: `Arc<E>` is itself an engine.
///
/// Lets several components (catalog, store, query path) hold the same
/// backend without threading references through every call.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Tx<'a>
        = E::Tx<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Tx<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Tx<'_>, StorageError> {
        (**self).begin_write()
    }
}
