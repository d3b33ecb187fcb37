use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{ColumnDef, Entity, EntitySchema, RelationshipDef, RelationshipKind, SqlType};

/// Mapping for the `parent` table
pub const PARENT_SCHEMA: EntitySchema = EntitySchema {
    name: "Parent",
    table: "parent",
    columns: &[ColumnDef {
        name: "id",
        sql_type: SqlType::Integer,
        primary_key: true,
        nullable: false,
        foreign_key: None,
    }],
    relationships: &[RelationshipDef {
        name: "children",
        target: "Child",
        kind: RelationshipKind::OneToMany,
        back_populates: Some("parent"),
    }],
};

/// Parent - the "one" side of the parent/child relationship
///
/// Owns an ordered collection of Child keys (relationship `children`).
/// The collection is only mutated through `ops::relationship_ops`, which keeps
/// every child's back-reference in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    id: i64,

    /// Child keys in insertion order
    pub(crate) children: Vec<i64>,
}

impl Parent {
    /// Create a Parent with an explicit primary key and no children
    pub fn new(id: i64) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Keys of the children collection, in insertion order
    pub fn child_ids(&self) -> &[i64] {
        &self.children
    }

    pub fn has_child(&self, child_id: i64) -> bool {
        self.children.contains(&child_id)
    }

    /// Push a child key unless already present
    pub(crate) fn push_child(&mut self, child_id: i64) {
        if !self.children.contains(&child_id) {
            self.children.push(child_id);
        }
    }

    pub(crate) fn remove_child(&mut self, child_id: i64) {
        self.children.retain(|id| *id != child_id);
    }
}

impl Entity for Parent {
    const SCHEMA: &'static EntitySchema = &PARENT_SCHEMA;

    fn primary_key(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Parent(id={})>", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parent() {
        let parent = Parent::new(1);
        assert_eq!(parent.id(), 1);
        assert!(parent.child_ids().is_empty());
        assert_eq!(parent.primary_key(), 1);
    }

    #[test]
    fn test_push_remove_child() {
        let mut parent = Parent::new(1);

        parent.push_child(5);
        parent.push_child(7);
        // Duplicate push keeps the original position
        parent.push_child(5);
        assert_eq!(parent.child_ids(), &[5, 7]);

        parent.remove_child(5);
        assert_eq!(parent.child_ids(), &[7]);
        assert!(!parent.has_child(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Parent::new(3).to_string(), "<Parent(id=3)>");
    }
}
