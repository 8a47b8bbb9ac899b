//! Concrete storage backend implementations.

pub mod redb;

pub use redb::{RedbConfig, RedbEngine};
