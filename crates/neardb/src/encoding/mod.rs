//! Serialization of catalog entries and vector rows.
//!
//! Catalog entries serialize with bincode directly. Vector rows use a
//! small envelope: namespace and values go through bincode, while the
//! metadata map is carried as raw JSON bytes inside the envelope, because
//! `serde_json::Value` cannot round-trip through a non-self-describing
//! format. The vector id is not stored in the row value at all; it lives
//! in the row key and is recovered from it on decode.

pub mod keys;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{IndexInfo, Metadata, VectorRecord};

pub use keys::{
    decode_vector_id, encode_catalog_key, encode_vector_key, vector_prefix, INDEX_ID_COUNTER_KEY,
    TABLE_CATALOG, TABLE_META, TABLE_VECTORS,
};

/// On-disk envelope for one vector row. The id lives in the key.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    namespace: Option<String>,
    values: Vec<f32>,
    metadata_json: Vec<u8>,
}

/// Encode a catalog entry.
pub(crate) fn encode_index_info(info: &IndexInfo) -> EngineResult<Vec<u8>> {
    bincode::serde::encode_to_vec(info, bincode::config::standard())
        .map_err(|e| EngineError::Encoding(format!("failed to encode index entry: {e}")))
}

/// Decode a catalog entry.
pub(crate) fn decode_index_info(bytes: &[u8]) -> EngineResult<IndexInfo> {
    let (info, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| EngineError::Encoding(format!("failed to decode index entry: {e}")))?;
    Ok(info)
}

/// Encode a vector record into its row value.
pub(crate) fn encode_record(record: &VectorRecord) -> EngineResult<Vec<u8>> {
    let metadata_json = serde_json::to_vec(&record.metadata)
        .map_err(|e| EngineError::Encoding(format!("failed to encode metadata: {e}")))?;

    let stored = StoredRecord {
        namespace: record.namespace.clone(),
        values: record.values.clone(),
        metadata_json,
    };

    bincode::serde::encode_to_vec(&stored, bincode::config::standard())
        .map_err(|e| EngineError::Encoding(format!("failed to encode vector row: {e}")))
}

/// Decode a vector record from its row key and value.
pub(crate) fn decode_record(key: &[u8], value: &[u8]) -> EngineResult<VectorRecord> {
    let id = decode_vector_id(key)
        .ok_or_else(|| EngineError::Encoding("malformed vector row key".to_string()))?
        .to_string();

    let (stored, _): (StoredRecord, _) =
        bincode::serde::decode_from_slice(value, bincode::config::standard())
            .map_err(|e| EngineError::Encoding(format!("failed to decode vector row: {e}")))?;

    let metadata: Metadata = serde_json::from_slice(&stored.metadata_json)
        .map_err(|e| EngineError::Encoding(format!("failed to decode metadata: {e}")))?;

    Ok(VectorRecord {
        id,
        values: stored.values,
        namespace: stored.namespace,
        metadata,
    })
}
