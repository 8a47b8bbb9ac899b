//! Redb storage backend.
//!
//! Implements the storage traits over redb, a pure-Rust embedded database
//! with ACID transactions. Redb serializes write transactions and gives
//! read transactions a consistent snapshot, which is exactly the isolation
//! the vector engine's count maintenance depends on.
//!
//! # Example
//!
//! ```ignore
//! use neardb_storage::backends::RedbEngine;
//! use neardb_storage::{StorageEngine, Transaction};
//!
//! let engine = RedbEngine::open("neardb.redb")?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put("catalog", b"docs", b"...")?;
//! tx.commit()?;
//! ```
//!
//! For tests, [`RedbEngine::in_memory`] creates a database that is dropped
//! with the engine.

mod engine;
mod tables;
mod transaction;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::{RedbScan, RedbTransaction};
