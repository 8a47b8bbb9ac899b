//! The vector store: validated, transactional vector mutation and the
//! ranked query path.
//!
//! Every public operation is a single transaction against the backing
//! store. Mutations validate before staging any write, so an error return
//! rolls back with no partial batch effects, and the owning index's
//! `vector_count` is updated in the same transaction as the rows it
//! counts.
//!
//! Count maintenance is deliberately asymmetric: `insert` increments
//! (every row is known-new once duplicates are rejected), while `upsert`
//! and the delete operations recount with a prefix scan, because those
//! operations cannot locally tell how many of their ids were new,
//! replaced, or removed.

use std::collections::HashSet;

use tracing::{debug, trace};

use neardb_storage::{Scan, StorageEngine, Transaction};

use crate::catalog::IndexCatalog;
use crate::distance::Metric;
use crate::encoding::{decode_record, encode_record, encode_vector_key, vector_prefix, TABLE_VECTORS};
use crate::error::{EngineError, EngineResult};
use crate::query::{Match, QueryOptions, TopK};
use crate::types::{IndexId, IndexInfo, VectorRecord};

/// A transactional store of named vector indexes and their vectors.
///
/// `VectorStore` is the engine's public surface: index catalog operations,
/// batch vector mutation, point lookup, and similarity queries. It is
/// generic over the backing [`StorageEngine`]; wrap the engine in an `Arc`
/// to share one store across threads.
///
/// # Example
///
/// ```ignore
/// use neardb::{Metric, QueryOptions, VectorRecord, VectorStore};
/// use neardb_storage::backends::RedbEngine;
///
/// let store = VectorStore::new(RedbEngine::in_memory()?);
///
/// store.create_index("docs", 3, Metric::Cosine, None)?;
/// store.insert("docs", vec![VectorRecord::new("v1", vec![1.0, 0.0, 0.0])])?;
///
/// let matches = store.query("docs", &[1.0, 0.0, 0.0], QueryOptions::new().top_k(1))?;
/// assert_eq!(matches[0].id, "v1");
/// ```
pub struct VectorStore<E: StorageEngine> {
    engine: E,
}

impl<E: StorageEngine> VectorStore<E> {
    /// Create a vector store over the given storage engine.
    #[must_use]
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    // ----- index catalog -------------------------------------------------

    /// Create a new vector index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexAlreadyExists`] for a duplicate name,
    /// [`EngineError::InvalidName`] / [`EngineError::InvalidArgument`] for
    /// a bad name or zero dimensions.
    pub fn create_index(
        &self,
        name: &str,
        dimensions: u32,
        metric: Metric,
        description: Option<String>,
    ) -> EngineResult<IndexInfo> {
        let mut tx = self.engine.begin_write()?;
        let info = IndexCatalog::create(&mut tx, name, dimensions, metric, description)?;
        tx.commit()?;

        debug!(index = name, dimensions, metric = %metric, "created index");
        Ok(info)
    }

    /// Get an index descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if no such index exists.
    pub fn get_index(&self, name: &str) -> EngineResult<IndexInfo> {
        let tx = self.engine.begin_read()?;
        IndexCatalog::get(&tx, name)
    }

    /// List all indexes, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog scan fails.
    pub fn list_indexes(&self) -> EngineResult<Vec<IndexInfo>> {
        let tx = self.engine.begin_read()?;
        IndexCatalog::list(&tx)
    }

    /// Delete an index and, atomically, every vector stored under it.
    ///
    /// Deleting an already-deleted name is [`EngineError::IndexNotFound`],
    /// not a no-op success.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if the name does not resolve.
    pub fn delete_index(&self, name: &str) -> EngineResult<()> {
        let mut tx = self.engine.begin_write()?;
        let info = IndexCatalog::get(&tx, name)?;

        let keys = collect_vector_keys(&tx, info.id())?;
        for key in &keys {
            tx.delete(TABLE_VECTORS, key)?;
        }

        IndexCatalog::remove(&mut tx, name)?;
        tx.commit()?;

        debug!(index = name, vectors = keys.len(), "deleted index");
        Ok(())
    }

    // ----- vector mutation -----------------------------------------------

    /// Insert a batch of vectors, all-or-nothing.
    ///
    /// The whole batch is validated against the index before any row is
    /// staged. Any id that already exists (in the store or twice within
    /// the batch) fails the entire batch. On success `vector_count` is
    /// incremented by the batch size in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`],
    /// [`EngineError::DimensionMismatch`],
    /// [`EngineError::VectorAlreadyExists`], or
    /// [`EngineError::InvalidArgument`] for malformed records. On error no
    /// rows are changed.
    pub fn insert(&self, name: &str, records: Vec<VectorRecord>) -> EngineResult<()> {
        let mut tx = self.engine.begin_write()?;
        let mut info = IndexCatalog::get(&tx, name)?;

        if records.is_empty() {
            return Ok(());
        }

        for record in &records {
            record.validate(info.dimensions())?;
        }

        let mut batch_ids = HashSet::with_capacity(records.len());
        for record in &records {
            if !batch_ids.insert(record.id.as_str()) {
                return Err(EngineError::VectorAlreadyExists {
                    index: name.to_string(),
                    id: record.id.clone(),
                });
            }
            let key = encode_vector_key(info.id(), &record.id);
            if tx.get(TABLE_VECTORS, &key)?.is_some() {
                return Err(EngineError::VectorAlreadyExists {
                    index: name.to_string(),
                    id: record.id.clone(),
                });
            }
        }

        for record in &records {
            let key = encode_vector_key(info.id(), &record.id);
            tx.put(TABLE_VECTORS, &key, &encode_record(record)?)?;
        }

        info.add_vectors(records.len() as u64);
        IndexCatalog::store(&mut tx, &info)?;
        tx.commit()?;

        debug!(index = name, inserted = records.len(), "inserted vectors");
        Ok(())
    }

    /// Upsert a batch of vectors (insert-or-replace by id), all-or-nothing.
    ///
    /// Returns the number of rows present in the index after the batch.
    /// Because some ids may be replacements, the count is recomputed from
    /// the rows inside the same transaction rather than incremented.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`],
    /// [`EngineError::DimensionMismatch`], or
    /// [`EngineError::InvalidArgument`] for malformed records. On error no
    /// rows are changed.
    pub fn upsert(&self, name: &str, records: Vec<VectorRecord>) -> EngineResult<u64> {
        let mut tx = self.engine.begin_write()?;
        let mut info = IndexCatalog::get(&tx, name)?;

        if records.is_empty() {
            return Ok(info.vector_count());
        }

        for record in &records {
            record.validate(info.dimensions())?;
        }

        for record in &records {
            let key = encode_vector_key(info.id(), &record.id);
            tx.put(TABLE_VECTORS, &key, &encode_record(record)?)?;
        }

        let count = count_vector_rows(&tx, info.id())?;
        info.set_vector_count(count);
        IndexCatalog::store(&mut tx, &info)?;
        tx.commit()?;

        debug!(index = name, upserted = records.len(), count, "upserted vectors");
        Ok(count)
    }

    /// Fetch vectors by id.
    ///
    /// Ids that are not present are silently omitted; an empty `ids` slice
    /// returns an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if the index does not exist.
    pub fn get_by_ids(
        &self,
        name: &str,
        ids: &[impl AsRef<str>],
    ) -> EngineResult<Vec<VectorRecord>> {
        let tx = self.engine.begin_read()?;
        let info = IndexCatalog::get(&tx, name)?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let key = encode_vector_key(info.id(), id.as_ref());
            if let Some(value) = tx.get(TABLE_VECTORS, &key)? {
                records.push(decode_record(&key, &value)?);
            }
        }
        Ok(records)
    }

    /// Delete vectors by id, then recount.
    ///
    /// Ids that do not match any row are ignored; an empty `ids` slice is
    /// a no-op (the index is still resolved, so an unknown name errors).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if the index does not exist.
    pub fn delete_by_ids(&self, name: &str, ids: &[impl AsRef<str>]) -> EngineResult<()> {
        let mut tx = self.engine.begin_write()?;
        let mut info = IndexCatalog::get(&tx, name)?;

        if ids.is_empty() {
            return Ok(());
        }

        let mut removed = 0u64;
        for id in ids {
            let key = encode_vector_key(info.id(), id.as_ref());
            if tx.delete(TABLE_VECTORS, &key)? {
                removed += 1;
            }
        }

        let count = count_vector_rows(&tx, info.id())?;
        info.set_vector_count(count);
        IndexCatalog::store(&mut tx, &info)?;
        tx.commit()?;

        debug!(index = name, removed, "deleted vectors by id");
        Ok(())
    }

    /// Delete every vector whose namespace equals `namespace`, then recount.
    ///
    /// `None` deletes the vectors that were stored with no namespace; it is
    /// not a wildcard.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] if the index does not exist.
    pub fn delete_by_namespace(&self, name: &str, namespace: Option<&str>) -> EngineResult<()> {
        let mut tx = self.engine.begin_write()?;
        let mut info = IndexCatalog::get(&tx, name)?;

        // Collect matching keys first; deleting needs the mutable borrow.
        let mut keys = Vec::new();
        {
            let mut scan = tx.scan_prefix(TABLE_VECTORS, &vector_prefix(info.id()))?;
            while let Some((key, value)) = scan.next()? {
                let record = decode_record(&key, &value)?;
                if record.namespace.as_deref() == namespace {
                    keys.push(key);
                }
            }
        }

        for key in &keys {
            tx.delete(TABLE_VECTORS, key)?;
        }

        let count = count_vector_rows(&tx, info.id())?;
        info.set_vector_count(count);
        IndexCatalog::store(&mut tx, &info)?;
        tx.commit()?;

        debug!(index = name, removed = keys.len(), "deleted vectors by namespace");
        Ok(())
    }

    // ----- query ---------------------------------------------------------

    /// Run a ranked top-K similarity query against an index.
    ///
    /// Candidates are filtered (namespace, conjunctive metadata equality)
    /// before scoring with the index's fixed metric; results come back in
    /// descending score order with ties broken by id ascending.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexNotFound`] for an unknown index and
    /// [`EngineError::DimensionMismatch`] if the query vector length does
    /// not match the index. Everything else degrades gracefully (empty
    /// scan, empty filter, clamped `top_k`).
    pub fn query(
        &self,
        name: &str,
        vector: &[f32],
        options: QueryOptions,
    ) -> EngineResult<Vec<Match>> {
        let tx = self.engine.begin_read()?;
        let info = IndexCatalog::get(&tx, name)?;

        if vector.len() != info.dimensions() as usize {
            return Err(EngineError::DimensionMismatch {
                expected: info.dimensions() as usize,
                actual: vector.len(),
            });
        }

        let metric = info.metric();
        let mut ranking = TopK::new(options.effective_top_k());
        let mut scanned = 0usize;

        let mut scan = tx.scan_prefix(TABLE_VECTORS, &vector_prefix(info.id()))?;
        while let Some((key, value)) = scan.next()? {
            scanned += 1;
            let record = decode_record(&key, &value)?;
            if !options.admits(&record) {
                continue;
            }

            let score = metric.score(vector, &record.values);
            if let Some(threshold) = options.score_threshold {
                if score < threshold {
                    continue;
                }
            }
            ranking.push(record, score);
        }

        trace!(index = name, scanned, "scored query candidates");
        Ok(ranking.into_matches(&options))
    }
}

/// Collect the keys of every vector row belonging to an index.
fn collect_vector_keys<T: Transaction>(tx: &T, index_id: IndexId) -> EngineResult<Vec<Vec<u8>>> {
    let mut scan = tx.scan_prefix(TABLE_VECTORS, &vector_prefix(index_id))?;
    let mut keys = Vec::new();
    while let Some((key, _)) = scan.next()? {
        keys.push(key);
    }
    Ok(keys)
}

/// Count the vector rows belonging to an index, as seen by `tx`.
fn count_vector_rows<T: Transaction>(tx: &T, index_id: IndexId) -> EngineResult<u64> {
    let mut scan = tx.scan_prefix(TABLE_VECTORS, &vector_prefix(index_id))?;
    let mut count = 0;
    while scan.next()?.is_some() {
        count += 1;
    }
    Ok(count)
}
