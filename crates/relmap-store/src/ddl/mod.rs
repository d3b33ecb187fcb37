//! Table creation from the schema registry
//!
//! DDL is generated from the static entity mappings, applied in foreign-key
//! order, and recorded with a SHA-256 checksum so later runs can tell an
//! unchanged table from one whose mapping drifted.

pub mod checksums;
pub mod generate;
pub mod runner;

pub use generate::{create_table_sql, drop_table_sql};
pub use runner::{create_all, drop_all, recorded_tables, TableRecord};
