//! Declarative class-to-table mapping
//!
//! Each entity type carries a static `EntitySchema` (table name, columns,
//! keys, relationships). The schemas are resolved at startup into a
//! `SchemaRegistry`, which validates cross-entity references and answers
//! metadata inspection.

pub mod registry;

pub use registry::{SchemaRegistry, SchemaRegistryBuilder};

use std::fmt;

/// SQL storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    /// Type name used in DDL
    pub fn ddl(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer => write!(f, "Integer()"),
            SqlType::Text => write!(f, "Text()"),
        }
    }
}

/// Foreign key target (`table.column`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub table: &'static str,
    pub column: &'static str,
}

/// Static column declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub nullable: bool,
    pub foreign_key: Option<ForeignKeyDef>,
}

/// Cardinality of a relationship as seen from the declaring entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// Collection side (parent.children)
    OneToMany,
    /// Scalar side (child.parent)
    ManyToOne,
}

impl RelationshipKind {
    pub fn inverse(&self) -> Self {
        match self {
            RelationshipKind::OneToMany => RelationshipKind::ManyToOne,
            RelationshipKind::ManyToOne => RelationshipKind::OneToMany,
        }
    }
}

/// Static relationship declaration
///
/// `back_populates` names the inverse relationship on the target entity.
/// `None` declares a one-directional relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipDef {
    pub name: &'static str,
    pub target: &'static str,
    pub kind: RelationshipKind,
    pub back_populates: Option<&'static str>,
}

/// Static mapping of one entity type to one table
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    pub relationships: &'static [RelationshipDef],
}

impl EntitySchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Primary key columns in declaration order
    pub fn primary_key(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    /// Resolved column descriptors, in declaration order
    pub fn column_descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .map(|c| ColumnDescriptor {
                table: self.table,
                name: c.name,
                sql_type: c.sql_type,
                primary_key: c.primary_key,
                nullable: c.nullable && !c.primary_key,
                foreign_key: c.foreign_key,
            })
            .collect()
    }
}

/// A mapped entity type
pub trait Entity {
    /// Static mapping for this type
    const SCHEMA: &'static EntitySchema;

    /// Value of the integer primary key
    fn primary_key(&self) -> i64;
}

/// Column metadata as returned by inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub table: &'static str,
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub nullable: bool,
    pub foreign_key: Option<ForeignKeyDef>,
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column('{}', {}", self.name, self.sql_type)?;
        if let Some(fk) = &self.foreign_key {
            write!(f, ", ForeignKey('{}.{}')", fk.table, fk.column)?;
        }
        write!(f, ", table=<{}>", self.table)?;
        if self.primary_key {
            write!(f, ", primary_key=True")?;
        }
        if !self.nullable {
            write!(f, ", nullable=False")?;
        }
        write!(f, ")")
    }
}

/// Column descriptors for an entity type
pub fn inspect<E: Entity>() -> Vec<ColumnDescriptor> {
    E::SCHEMA.column_descriptors()
}
