use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{
    ColumnDef, Entity, EntitySchema, ForeignKeyDef, RelationshipDef, RelationshipKind, SqlType,
};

/// Mapping for the `child` table
pub const CHILD_SCHEMA: EntitySchema = EntitySchema {
    name: "Child",
    table: "child",
    columns: &[
        ColumnDef {
            name: "id",
            sql_type: SqlType::Integer,
            primary_key: true,
            nullable: false,
            foreign_key: None,
        },
        ColumnDef {
            name: "parent_id",
            sql_type: SqlType::Integer,
            primary_key: false,
            nullable: true,
            foreign_key: Some(ForeignKeyDef {
                table: "parent",
                column: "id",
            }),
        },
    ],
    relationships: &[RelationshipDef {
        name: "parent",
        target: "Parent",
        kind: RelationshipKind::ManyToOne,
        back_populates: Some("children"),
    }],
};

/// Child - the "many" side of the parent/child relationship
///
/// Holds two views of its owner:
/// - `parent_id`: the foreign-key column as last flushed or loaded
/// - `parent`: the in-memory back-reference (relationship `parent`)
///
/// The back-reference is authoritative in memory. The unit of work copies it
/// into `parent_id` on flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    id: i64,
    pub(crate) parent_id: Option<i64>,
    pub(crate) parent: Option<i64>,
}

impl Child {
    /// Create a Child with an explicit primary key and no parent
    pub fn new(id: i64) -> Self {
        Self {
            id,
            parent_id: None,
            parent: None,
        }
    }

    /// Build a Child from a stored row; the back-reference is resolved later
    pub fn from_row(id: i64, parent_id: Option<i64>) -> Self {
        Self {
            id,
            parent_id,
            parent: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Foreign-key column value
    pub fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    /// Key of the parent this child's back-reference points to
    pub fn parent_key(&self) -> Option<i64> {
        self.parent
    }

    /// Whether the column lags the relationship (a flush would change it)
    pub fn is_fk_stale(&self) -> bool {
        self.parent_id != self.parent
    }

    /// Copy the back-reference into the foreign-key column
    pub fn sync_foreign_key(&mut self) {
        self.parent_id = self.parent;
    }
}

impl Entity for Child {
    const SCHEMA: &'static EntitySchema = &CHILD_SCHEMA;

    fn primary_key(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent_id {
            Some(parent_id) => write!(f, "<Child(id={}, parent_id={})>", self.id, parent_id),
            None => write!(f, "<Child(id={}, parent_id=None)>", self.id),
        }
    }
}
