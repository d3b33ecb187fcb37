pub mod relationship_ops;
pub mod store;

pub use relationship_ops::{append_child, children_of, parent_of, remove_child, set_parent};
pub use store::Store;
