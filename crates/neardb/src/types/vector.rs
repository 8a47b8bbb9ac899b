//! Vector records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{EngineError, EngineResult};

/// Metadata attached to a vector: string keys mapped to JSON values.
///
/// The engine enforces no schema on metadata; it is used only for
/// conjunctive equality filtering at query time and for optional response
/// enrichment.
pub type Metadata = BTreeMap<String, JsonValue>;

/// One stored embedding: caller-supplied id, values, and optional
/// namespace and metadata.
///
/// Identity is `(index, id)`; the namespace is purely a filter dimension
/// and never part of identity. Values must match the owning index's
/// dimensionality exactly, which the store validates on every write.
///
/// # Example
///
/// ```
/// use neardb::VectorRecord;
///
/// let record = VectorRecord::new("doc-1", vec![0.1, 0.2, 0.3])
///     .with_namespace("tenant-a")
///     .with_metadata_field("category", "reference");
/// assert_eq!(record.id, "doc-1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Caller-supplied id, unique within an index.
    pub id: String,
    /// The embedding values.
    pub values: Vec<f32>,
    /// Optional partition label.
    pub namespace: Option<String>,
    /// Optional metadata for filtering and enrichment.
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorRecord {
    /// Create a record with no namespace and empty metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self { id: id.into(), values, namespace: None, metadata: Metadata::new() }
    }

    /// Set the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Replace the metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Insert a single metadata field.
    #[must_use]
    pub fn with_metadata_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validate the record against an index's dimensionality.
    ///
    /// Checks the id is non-empty, every value is finite, and the length
    /// matches. Runs before any write is staged so a failing batch leaves
    /// no rows behind.
    pub(crate) fn validate(&self, dimensions: u32) -> EngineResult<()> {
        if self.id.is_empty() {
            return Err(EngineError::InvalidArgument("vector id cannot be empty".to_string()));
        }

        for (i, &value) in self.values.iter().enumerate() {
            if !value.is_finite() {
                return Err(EngineError::InvalidArgument(format!(
                    "vector '{}' has a non-finite value at position {i}",
                    self.id
                )));
            }
        }

        if self.values.len() != dimensions as usize {
            return Err(EngineError::DimensionMismatch {
                expected: dimensions as usize,
                actual: self.values.len(),
            });
        }

        Ok(())
    }
}
