pub mod invariants;

pub use invariants::{check_relationships, find_violations, Violation};
