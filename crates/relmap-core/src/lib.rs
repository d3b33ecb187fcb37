//! RelMap Core - in-memory relational mapping kernel
//!
//! This crate provides:
//! - Parent and Child entity models with static table mappings
//! - A schema registry resolving those mappings at startup
//! - The in-memory object graph (`Store`)
//! - Bidirectional relationship synchronization between `Parent.children`
//!   and `Child.parent`
//! - Relationship invariant checks
//! - The error and logging facilities shared by the workspace

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod schema;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, RelMapError, Result};
pub use model::{Child, EntityKey, Parent};
pub use ops::Store;
pub use schema::{inspect, ColumnDescriptor, Entity, EntitySchema, SchemaRegistry};
