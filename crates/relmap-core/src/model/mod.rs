pub mod child;
pub mod parent;

pub use child::Child;
pub use parent::Parent;

use std::fmt;

use crate::errors::Result;
use crate::schema::SchemaRegistry;

/// Registry holding the Parent and Child mappings
///
/// # Errors
/// * `InvalidSchema` - if the mappings are inconsistent
pub fn registry() -> Result<SchemaRegistry> {
    SchemaRegistry::builder()
        .register::<Parent>()
        .register::<Child>()
        .build()
}

/// Identity of an entity in the object graph: entity type plus primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Parent(i64),
    Child(i64),
}

impl EntityKey {
    /// Mapped entity name
    pub fn entity(&self) -> &'static str {
        match self {
            EntityKey::Parent(_) => "Parent",
            EntityKey::Child(_) => "Child",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            EntityKey::Parent(id) | EntityKey::Child(id) => *id,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_orders_parent_first() {
        let registry = registry().unwrap();
        let tables: Vec<_> = registry.creation_order().iter().map(|s| s.table).collect();
        assert_eq!(tables, vec!["parent", "child"]);
    }

    #[test]
    fn test_parents_order_before_children() {
        let mut keys = vec![EntityKey::Child(1), EntityKey::Parent(9), EntityKey::Parent(2)];
        keys.sort();
        assert_eq!(
            keys,
            vec![EntityKey::Parent(2), EntityKey::Parent(9), EntityKey::Child(1)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityKey::Child(5).to_string(), "Child#5");
    }
}
