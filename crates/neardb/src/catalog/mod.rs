//! The index catalog.
//!
//! Owns the registry of named vector indexes: their fixed dimensionality,
//! metric, and authoritative vector count. The catalog is a store-backed
//! table, not an in-process cache, so every engine handle over the same
//! backing store observes one consistent view of it.
//!
//! All operations run against a borrowed [`Transaction`], which is what
//! lets the vector store update a catalog row and the vector rows it
//! governs inside a single transaction.

use neardb_storage::{Scan, Transaction};

use crate::distance::Metric;
use crate::encoding::{
    decode_index_info, encode_catalog_key, encode_index_info, INDEX_ID_COUNTER_KEY, TABLE_CATALOG,
    TABLE_META,
};
use crate::error::{EngineError, EngineResult};
use crate::types::{IndexId, IndexInfo, IndexName};

/// Catalog operations over a borrowed transaction.
pub struct IndexCatalog;

impl IndexCatalog {
    /// Create a new index entry with `vector_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidName`] / [`EngineError::InvalidArgument`]
    /// for a bad name or zero dimensions, and
    /// [`EngineError::IndexAlreadyExists`] if the name is taken.
    pub fn create<T: Transaction>(
        tx: &mut T,
        name: &str,
        dimensions: u32,
        metric: Metric,
        description: Option<String>,
    ) -> EngineResult<IndexInfo> {
        let name = IndexName::new(name)?;

        if dimensions == 0 {
            return Err(EngineError::InvalidArgument(
                "index dimensions must be a positive integer".to_string(),
            ));
        }

        let key = encode_catalog_key(name.as_str());
        if tx.get(TABLE_CATALOG, &key)?.is_some() {
            return Err(EngineError::IndexAlreadyExists(name.into_string()));
        }

        let id = Self::next_id(tx)?;
        let info = IndexInfo::new(id, name, dimensions, metric, description);
        Self::store(tx, &info)?;

        Ok(info)
    }

    /// Load an index entry by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if no such index exists.
    pub fn get<T: Transaction>(tx: &T, name: &str) -> EngineResult<IndexInfo> {
        let key = encode_catalog_key(name);
        let bytes = tx
            .get(TABLE_CATALOG, &key)?
            .ok_or_else(|| EngineError::IndexNotFound(name.to_string()))?;
        decode_index_info(&bytes)
    }

    /// List all index entries, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog scan or decoding fails.
    pub fn list<T: Transaction>(tx: &T) -> EngineResult<Vec<IndexInfo>> {
        let mut scan = tx.scan_prefix(TABLE_CATALOG, &[])?;

        let mut indexes = Vec::new();
        while let Some((_, value)) = scan.next()? {
            indexes.push(decode_index_info(&value)?);
        }
        Ok(indexes)
    }

    /// Write an index entry, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn store<T: Transaction>(tx: &mut T, info: &IndexInfo) -> EngineResult<()> {
        let key = encode_catalog_key(info.name().as_str());
        let value = encode_index_info(info)?;
        tx.put(TABLE_CATALOG, &key, &value)?;
        Ok(())
    }

    /// Delete an index entry by name.
    ///
    /// Returns `true` if the entry existed. The caller is responsible for
    /// cascading to the index's vector rows in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove<T: Transaction>(tx: &mut T, name: &str) -> EngineResult<bool> {
        let key = encode_catalog_key(name);
        Ok(tx.delete(TABLE_CATALOG, &key)?)
    }

    /// Allocate the next index id from the persistent counter.
    fn next_id<T: Transaction>(tx: &mut T) -> EngineResult<IndexId> {
        let current = match tx.get(TABLE_META, INDEX_ID_COUNTER_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    EngineError::Encoding("malformed index id counter".to_string())
                })?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };

        let next = current + 1;
        tx.put(TABLE_META, INDEX_ID_COUNTER_KEY, &next.to_be_bytes())?;
        Ok(IndexId::new(next))
    }
}
