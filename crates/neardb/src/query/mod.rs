//! Query options, candidate filtering, and top-K ranking.
//!
//! The query path is a brute-force scan: every candidate row of the index
//! is decoded, filtered (namespace, then conjunctive metadata equality),
//! scored with the index metric, and fed through a bounded heap that keeps
//! the K best matches seen so far. Scores are similarity-oriented for all
//! metrics (see [`crate::distance`]), so ranking is uniformly descending.
//!
//! Ties on score break by vector id ascending, which makes result order
//! fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::{Metadata, VectorRecord};

/// Default number of matches a query returns.
pub const DEFAULT_TOP_K: usize = 10;

/// Hard upper bound on `top_k`; larger requests are silently clamped.
pub const MAX_TOP_K: usize = 100;

/// Controls whether vector values or metadata are included in matches.
///
/// `Indexed` exists for wire compatibility with callers that distinguish
/// indexed from full metadata; this engine has no secondary metadata
/// indexes, so it behaves like `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnSpec {
    /// Do not include the field.
    #[default]
    None,
    /// Include indexed fields.
    Indexed,
    /// Include everything.
    All,
}

impl ReturnSpec {
    /// Whether the field should be included in a match.
    #[must_use]
    pub const fn include(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Options for a similarity query. All fields have defaults.
///
/// # Example
///
/// ```
/// use neardb::{QueryOptions, ReturnSpec};
///
/// let options = QueryOptions::new()
///     .top_k(5)
///     .namespace("tenant-a")
///     .filter_field("category", "reference")
///     .return_metadata(ReturnSpec::All);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum matches to return. `0` falls back to [`DEFAULT_TOP_K`];
    /// values above [`MAX_TOP_K`] are clamped.
    pub top_k: usize,
    /// If set, only vectors with this exact namespace participate.
    pub namespace: Option<String>,
    /// Conjunctive equality filter over metadata. Empty means no filter.
    pub filter: Metadata,
    /// Whether to include vector values in matches.
    pub return_values: ReturnSpec,
    /// Whether to include metadata in matches.
    pub return_metadata: ReturnSpec,
    /// Drop matches scoring below this threshold.
    pub score_threshold: Option<f32>,
}

impl QueryOptions {
    /// Create options with all defaults (`top_k = 10`, no filtering).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of matches.
    #[must_use]
    pub const fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Restrict candidates to an exact namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Replace the metadata filter.
    #[must_use]
    pub fn filter(mut self, filter: Metadata) -> Self {
        self.filter = filter;
        self
    }

    /// Add a single metadata equality condition.
    #[must_use]
    pub fn filter_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Control inclusion of vector values in matches.
    #[must_use]
    pub const fn return_values(mut self, spec: ReturnSpec) -> Self {
        self.return_values = spec;
        self
    }

    /// Control inclusion of metadata in matches.
    #[must_use]
    pub const fn return_metadata(mut self, spec: ReturnSpec) -> Self {
        self.return_metadata = spec;
        self
    }

    /// Drop matches scoring below the threshold.
    #[must_use]
    pub const fn score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// The top-K value after default fallback and clamping.
    pub(crate) fn effective_top_k(&self) -> usize {
        if self.top_k == 0 {
            DEFAULT_TOP_K
        } else {
            self.top_k.min(MAX_TOP_K)
        }
    }

    /// Whether a candidate participates in scoring.
    ///
    /// Namespace is an exact match; the metadata filter requires every key
    /// to be present and compare equal in string form. A missing key
    /// excludes the candidate.
    pub(crate) fn admits(&self, record: &VectorRecord) -> bool {
        if let Some(namespace) = &self.namespace {
            if record.namespace.as_deref() != Some(namespace.as_str()) {
                return false;
            }
        }

        self.filter.iter().all(|(key, expected)| {
            record
                .metadata
                .get(key)
                .is_some_and(|actual| canonical_text(actual) == canonical_text(expected))
        })
    }
}

/// String form used for metadata equality: strings compare by content,
/// everything else by its canonical JSON text.
fn canonical_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One ranked query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// The matched vector's id.
    pub id: String,
    /// Similarity score under the index metric; larger is better.
    pub score: f32,
    /// Vector values, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
    /// Metadata, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Bounded selection of the K best-scoring candidates.
///
/// Keeps a max-heap whose top is the *worst* retained entry, so each new
/// candidate costs one comparison against the current cutoff and only
/// O(log K) work when it displaces something.
pub(crate) struct TopK {
    capacity: usize,
    heap: BinaryHeap<RankedEntry>,
}

struct RankedEntry {
    score: f32,
    record: VectorRecord,
}

impl PartialEq for RankedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedEntry {}

impl PartialOrd for RankedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Heap order puts the worst entry on top: lower score is "greater",
        // and on equal scores the larger id is "greater". Scores are finite
        // because stored values and scoring rules exclude NaN.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.record.id.cmp(&other.record.id))
    }
}

impl TopK {
    pub(crate) fn new(capacity: usize) -> Self {
        Self { capacity, heap: BinaryHeap::with_capacity(capacity.saturating_add(1)) }
    }

    /// Offer a scored candidate.
    pub(crate) fn push(&mut self, record: VectorRecord, score: f32) {
        if self.capacity == 0 {
            return;
        }

        let entry = RankedEntry { score, record };
        if self.heap.len() < self.capacity {
            self.heap.push(entry);
        } else if let Some(worst) = self.heap.peek() {
            if entry < *worst {
                self.heap.pop();
                self.heap.push(entry);
            }
        }
    }

    /// Finish the selection: best-first order, materialized per the
    /// requested return specs.
    pub(crate) fn into_matches(self, options: &QueryOptions) -> Vec<Match> {
        let mut entries = self.heap.into_vec();
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });

        entries
            .into_iter()
            .map(|entry| {
                let RankedEntry { score, record } = entry;
                Match {
                    id: record.id,
                    score,
                    values: options.return_values.include().then_some(record.values),
                    metadata: options.return_metadata.include().then_some(record.metadata),
                }
            })
            .collect()
    }
}
