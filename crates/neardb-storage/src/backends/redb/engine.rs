//! Redb storage engine implementation.

use std::path::Path;

use redb::Database;

use crate::engine::{StorageEngine, StorageError};

use super::transaction::RedbTransaction;

/// Configuration options for the redb backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Page cache size in bytes. Uses redb's default when unset.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A storage engine backed by redb.
///
/// Redb commits are durable, write transactions are serialized, and read
/// transactions see a stable snapshot, so this backend satisfies all the
/// transactional requirements the vector engine states for its store.
pub struct RedbEngine {
    db: Database,
}

impl RedbEngine {
    /// Open or create a database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a database file with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be opened or created.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RedbConfig,
    ) -> Result<Self, StorageError> {
        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database, lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db })
    }
}

impl StorageEngine for RedbEngine {
    type Tx<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Tx<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Tx<'_>, StorageError> {
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }
}
