//! Key encoding for catalog and vector storage.
//!
//! # Key formats
//!
//! ## Catalog
//! Catalog rows are keyed by the raw index name, so a full catalog scan
//! yields indexes in name order.
//!
//! ## Vectors
//! `[index_id: u64 BE][vector id bytes]`
//!
//! The big-endian index id gives every index one contiguous key range:
//! point lookups concatenate id and vector id, and per-index scans use the
//! 8-byte id as prefix. Distinct ids can never produce colliding prefixes
//! because the prefix width is fixed.

use crate::types::IndexId;

/// Logical table holding catalog rows (one per index, keyed by name).
pub const TABLE_CATALOG: &str = "catalog";

/// Logical table holding vector rows.
pub const TABLE_VECTORS: &str = "vectors";

/// Logical table for engine bookkeeping (id counter).
pub const TABLE_META: &str = "meta";

/// Key of the persistent index id counter in [`TABLE_META`].
pub const INDEX_ID_COUNTER_KEY: &[u8] = b"index_id_counter";

/// Encode the catalog key for an index name.
#[must_use]
pub fn encode_catalog_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Encode the storage key for a vector row.
#[must_use]
pub fn encode_vector_key(index_id: IndexId, vector_id: &str) -> Vec<u8> {
    let id_bytes = vector_id.as_bytes();
    let mut key = Vec::with_capacity(8 + id_bytes.len());
    key.extend_from_slice(&index_id.as_u64().to_be_bytes());
    key.extend_from_slice(id_bytes);
    key
}

/// The scan prefix covering every vector row of an index.
#[must_use]
pub fn vector_prefix(index_id: IndexId) -> Vec<u8> {
    index_id.as_u64().to_be_bytes().to_vec()
}

/// Recover the vector id from a vector row key.
///
/// Returns `None` if the key is shorter than the index-id prefix or the id
/// bytes are not valid UTF-8.
#[must_use]
pub fn decode_vector_id(key: &[u8]) -> Option<&str> {
    if key.len() < 8 {
        return None;
    }
    std::str::from_utf8(&key[8..]).ok()
}
