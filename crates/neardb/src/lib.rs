//! `NearDB`
//!
//! An embedded vector index and similarity-search engine. `NearDB` stores
//! fixed-dimension `f32` vectors under named indexes inside a transactional
//! key-value store and answers ranked top-K similarity queries with
//! optional namespace and metadata filtering.
//!
//! # Overview
//!
//! Three pieces make up the engine:
//!
//! - **Index catalog** ([`catalog`]): named indexes with a fixed
//!   dimensionality and metric, and an authoritative per-index vector
//!   count.
//! - **Vector store** ([`store`]): validated, all-or-nothing batch
//!   mutation (insert, upsert, delete) that keeps the catalog count
//!   consistent with the rows in every transaction.
//! - **Query path** ([`query`]): a brute-force scan that filters,
//!   scores with the index metric, and ranks the top-K matches.
//!
//! There is no approximate-nearest-neighbor structure here by design: the
//! engine is a correct, transactional scorer, and callers that need
//! ANN-grade latency put an index structure in front of it.
//!
//! # Example
//!
//! ```ignore
//! use neardb::{Metric, QueryOptions, ReturnSpec, VectorRecord, VectorStore};
//! use neardb_storage::backends::RedbEngine;
//!
//! let store = VectorStore::new(RedbEngine::open("vectors.redb")?);
//!
//! store.create_index("docs", 3, Metric::Cosine, None)?;
//! store.insert("docs", vec![
//!     VectorRecord::new("v1", vec![1.0, 0.0, 0.0])
//!         .with_metadata_field("category", "reference"),
//!     VectorRecord::new("v2", vec![0.0, 1.0, 0.0]),
//! ])?;
//!
//! let matches = store.query(
//!     "docs",
//!     &[1.0, 0.0, 0.0],
//!     QueryOptions::new().top_k(1).return_metadata(ReturnSpec::All),
//! )?;
//! assert_eq!(matches[0].id, "v1");
//! ```
//!
//! # Modules
//!
//! - [`store`] - The engine surface: [`VectorStore`]
//! - [`catalog`] - Index catalog operations over a borrowed transaction
//! - [`query`] - Query options, filtering, and top-K ranking
//! - [`distance`] - Metrics and scoring kernels
//! - [`types`] - [`IndexName`], [`IndexInfo`], [`VectorRecord`]
//! - [`encoding`] - Key layout and row serialization
//! - [`error`] - [`EngineError`]

pub mod catalog;
pub mod distance;
pub mod encoding;
pub mod error;
pub mod query;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use distance::Metric;
pub use error::{EngineError, EngineResult};
pub use query::{Match, QueryOptions, ReturnSpec, DEFAULT_TOP_K, MAX_TOP_K};
pub use store::VectorStore;
pub use types::{IndexId, IndexInfo, IndexName, Metadata, VectorRecord};
