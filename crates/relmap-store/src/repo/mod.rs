//! Repository layer for persisting the object graph to SQLite
//!
//! Bridges the in-memory `Store` and the `parent`/`child` tables

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
