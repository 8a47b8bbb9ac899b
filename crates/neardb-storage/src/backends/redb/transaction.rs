//! Redb transaction and prefix scan implementation.
//!
//! Scans stream in bounded batches instead of materializing the whole
//! range: a scan holds at most `BATCH_SIZE` decoded entries at a time and
//! re-enters the table for the next batch on demand, so iterating a large
//! index costs the same memory as a small one.

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{KeyValue, Scan, StorageError, Transaction};

use super::tables::{decode_key, encode_key, prefix_successor, table_end_key, DATA_TABLE};

/// Entries fetched per batch while scanning.
const BATCH_SIZE: usize = 1024;

/// A transaction for the redb engine, wrapping either a read-only or a
/// read-write redb transaction behind the [`Transaction`] trait.
pub enum RedbTransaction {
    /// A read-only transaction (snapshot).
    Read(ReadTransaction),
    /// A read-write transaction (serialized by redb).
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Wrap a read-only redb transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Wrap a read-write redb transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Fetch up to `limit` entries of a logical table whose keys start with
    /// `prefix`, beginning after `after` (exclusive) when given.
    fn fetch_batch(
        &self,
        table: &str,
        prefix: &[u8],
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        let start = match after {
            Some(key) => encode_key(table, key),
            None => encode_key(table, prefix),
        };
        let end = prefix_successor(&encode_key(table, prefix))
            .unwrap_or_else(|| table_end_key(table));

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => collect_batch(&t, &start, &end, after, limit),
                // No data table yet means nothing was ever written.
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                collect_batch(&t, &start, &end, after, limit)
            }
        }
    }
}

fn collect_batch<T>(
    table: &T,
    start: &[u8],
    end: &[u8],
    after: Option<&[u8]>,
    limit: usize,
) -> Result<Vec<KeyValue>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let range = table.range(start..end).map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::with_capacity(limit.min(BATCH_SIZE));
    let mut first = true;
    for entry in range {
        let (key, value) = entry.map_err(|e| StorageError::Internal(e.to_string()))?;
        let Some((_, logical)) = decode_key(key.value()) else {
            continue;
        };

        // The range starts at the continuation key itself; drop that one.
        if first {
            first = false;
            if after == Some(logical) {
                continue;
            }
        }

        entries.push((logical.to_vec(), value.value().to_vec()));
        if entries.len() >= limit {
            break;
        }
    }

    Ok(entries)
}

impl Transaction for RedbTransaction {
    type Scan<'a>
        = RedbScan<'a>
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let encoded = encode_key(table, key);

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => lookup(&t, &encoded),
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                lookup(&t, &encoded)
            }
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded = encode_key(table, key);
                let mut t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(encoded.as_slice(), value)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded = encode_key(table, key);
                let mut t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                let result = match t.remove(encoded.as_slice()) {
                    Ok(Some(_)) => Ok(true),
                    Ok(None) => Ok(false),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                };
                result
            }
        }
    }

    fn scan_prefix(&self, table: &str, prefix: &[u8]) -> Result<Self::Scan<'_>, StorageError> {
        Ok(RedbScan {
            tx: self,
            table: table.to_string(),
            prefix: prefix.to_vec(),
            batch: Vec::new().into_iter(),
            last_key: None,
            exhausted: false,
            started: false,
        })
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions have nothing to make durable.
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => {
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

fn lookup<T>(table: &T, encoded: &[u8]) -> Result<Option<Vec<u8>>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match table.get(encoded) {
        Ok(Some(value)) => Ok(Some(value.value().to_vec())),
        Ok(None) => Ok(None),
        Err(e) => Err(StorageError::Internal(e.to_string())),
    }
}

/// A batched, forward-only prefix scan over a redb transaction.
pub struct RedbScan<'a> {
    tx: &'a RedbTransaction,
    table: String,
    prefix: Vec<u8>,
    batch: std::vec::IntoIter<KeyValue>,
    /// Last key yielded, used as the continuation point for the next batch.
    last_key: Option<Vec<u8>>,
    exhausted: bool,
    started: bool,
}

impl Scan for RedbScan<'_> {
    fn next(&mut self) -> Result<Option<KeyValue>, StorageError> {
        loop {
            if let Some((key, value)) = self.batch.next() {
                self.last_key = Some(key.clone());
                return Ok(Some((key, value)));
            }

            if self.started && self.exhausted {
                return Ok(None);
            }

            let batch = self.tx.fetch_batch(
                &self.table,
                &self.prefix,
                self.last_key.as_deref(),
                BATCH_SIZE,
            )?;
            self.started = true;
            self.exhausted = batch.len() < BATCH_SIZE;
            if batch.is_empty() {
                return Ok(None);
            }
            self.batch = batch.into_iter();
        }
    }
}
