//! `NearDB` Storage
//!
//! This crate provides the transactional key-value abstraction that the
//! `NearDB` vector engine is built on, together with the redb-backed
//! implementation used in practice.
//!
//! The engine needs very little from its backing store: atomic read/write
//! transactions over logical tables, point lookups, and forward prefix
//! scans in key order. Those operations are captured by the [`StorageEngine`],
//! [`Transaction`] and [`Scan`] traits; [`backends::RedbEngine`] implements
//! them over a single redb database file (or an in-memory backend for tests).
//!
//! # Modules
//!
//! - [`engine`] - Storage traits and error types
//! - [`backends`] - Concrete backend implementations

pub mod backends;
pub mod engine;

pub use engine::{KeyValue, Scan, StorageEngine, StorageError, StorageResult, Transaction};
