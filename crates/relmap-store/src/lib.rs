//! RelMap Store - SQLite persistence for the relmap object graph
//!
//! This crate provides:
//! - Connection setup from an `EngineConfig` (optionally echoing SQL)
//! - Table creation from the schema registry, with DDL checksums
//! - Row-level repository and graph hydration
//! - The `Session` unit of work

#![allow(clippy::result_large_err)]

pub mod db;
pub mod ddl;
pub mod errors;
pub mod repo;
pub mod session;

pub use db::{DatabaseTarget, EngineConfig};
pub use errors::Result;
pub use session::Session;
