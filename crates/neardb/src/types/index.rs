//! Index catalog descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distance::Metric;

use super::IndexName;

/// Opaque identifier of a vector index, assigned at creation.
///
/// Ids are allocated from a persistent counter and never reused. They are
/// also the fixed-width storage prefix that keeps each index's vector rows
/// in one contiguous key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexId(u64);

impl IndexId {
    /// Create an index id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The catalog entry for one vector index.
///
/// Holds everything the engine needs to validate and score vectors for the
/// index: the fixed dimensionality, the fixed metric, and the authoritative
/// row count. `vector_count` is maintained inside the same transaction as
/// every row mutation, so a reader never observes a count that disagrees
/// with the rows visible in its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    id: IndexId,
    name: IndexName,
    description: Option<String>,
    dimensions: u32,
    metric: Metric,
    vector_count: u64,
    created_at: DateTime<Utc>,
}

impl IndexInfo {
    /// Create a catalog entry for a freshly created index (zero vectors).
    #[must_use]
    pub fn new(
        id: IndexId,
        name: IndexName,
        dimensions: u32,
        metric: Metric,
        description: Option<String>,
    ) -> Self {
        Self { id, name, description, dimensions, metric, vector_count: 0, created_at: Utc::now() }
    }

    /// The opaque index id.
    #[must_use]
    pub const fn id(&self) -> IndexId {
        self.id
    }

    /// The unique index name.
    #[must_use]
    pub fn name(&self) -> &IndexName {
        &self.name
    }

    /// Optional free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The fixed dimensionality of every vector in this index.
    #[must_use]
    pub const fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// The fixed similarity metric.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// Number of vector rows currently stored under this index.
    #[must_use]
    pub const fn vector_count(&self) -> u64 {
        self.vector_count
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Increase the row count after an insert of `added` known-new rows.
    pub(crate) fn add_vectors(&mut self, added: u64) {
        self.vector_count += added;
    }

    /// Replace the row count with a freshly recounted value.
    pub(crate) fn set_vector_count(&mut self, count: u64) {
        self.vector_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexInfo {
        IndexInfo::new(
            IndexId::new(7),
            IndexName::new("docs").unwrap(),
            384,
            Metric::Cosine,
            Some("document embeddings".to_string()),
        )
    }

    #[test]
    fn new_index_starts_empty() {
        let info = sample();
        assert_eq!(info.vector_count(), 0);
        assert_eq!(info.dimensions(), 384);
        assert_eq!(info.metric(), Metric::Cosine);
        assert_eq!(info.description(), Some("document embeddings"));
    }

    #[test]
    fn count_maintenance() {
        let mut info = sample();
        info.add_vectors(3);
        assert_eq!(info.vector_count(), 3);
        info.set_vector_count(1);
        assert_eq!(info.vector_count(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let info = sample();
        let bytes = bincode::serde::encode_to_vec(&info, bincode::config::standard()).unwrap();
        let (restored, _): (IndexInfo, _) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        assert_eq!(info, restored);
    }
}
