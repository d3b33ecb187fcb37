use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{ColumnDescriptor, Entity, EntitySchema, RelationshipKind, SqlType};
use crate::errors::{RelMapError, Result};

/// Collects entity schemas before validation
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: Vec<&'static EntitySchema>,
}

impl SchemaRegistryBuilder {
    /// Register a mapped entity type
    pub fn register<E: Entity>(self) -> Self {
        self.register_schema(E::SCHEMA)
    }

    /// Register a schema directly
    pub fn register_schema(mut self, schema: &'static EntitySchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Validate all registered schemas and resolve table creation order
    ///
    /// # Errors
    /// * `InvalidSchema` - duplicate names, bad keys, dangling foreign keys,
    ///   or relationship pairs that do not point at each other
    /// * `UnknownEntity` - a relationship targets an unregistered entity
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut entities = BTreeMap::new();
        let mut tables = HashSet::new();

        for schema in &self.schemas {
            if entities.insert(schema.name, *schema).is_some() {
                return Err(invalid(schema, "entity registered twice"));
            }
            if !tables.insert(schema.table) {
                return Err(invalid(
                    schema,
                    format!("table '{}' is mapped by more than one entity", schema.table),
                ));
            }
        }

        for schema in entities.values() {
            validate_columns(schema, &entities)?;
            validate_relationships(schema, &entities)?;
        }

        let creation_order = resolve_creation_order(&entities)?;

        Ok(SchemaRegistry {
            entities,
            creation_order,
        })
    }
}

/// Validated set of entity schemas
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entities: BTreeMap<&'static str, &'static EntitySchema>,
    creation_order: Vec<&'static str>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Look up an entity schema by entity name
    ///
    /// # Errors
    /// * `UnknownEntity` - if the entity was never registered
    pub fn get(&self, entity: &str) -> Result<&'static EntitySchema> {
        self.entities
            .get(entity)
            .copied()
            .ok_or_else(|| RelMapError::UnknownEntity {
                entity: entity.to_string(),
            })
    }

    /// Look up an entity schema by table name
    pub fn by_table(&self, table: &str) -> Option<&'static EntitySchema> {
        self.entities.values().copied().find(|s| s.table == table)
    }

    /// Registered entities, sorted by name
    pub fn entities(&self) -> impl Iterator<Item = &'static EntitySchema> + '_ {
        self.entities.values().copied()
    }

    /// Schemas ordered so every foreign key target precedes its referrer
    pub fn creation_order(&self) -> Vec<&'static EntitySchema> {
        self.creation_order
            .iter()
            .filter_map(|name| self.entities.get(name).copied())
            .collect()
    }

    /// Column descriptors of an entity
    ///
    /// # Errors
    /// * `UnknownEntity` - if the entity was never registered
    pub fn columns(&self, entity: &str) -> Result<Vec<ColumnDescriptor>> {
        Ok(self.get(entity)?.column_descriptors())
    }

    /// A single column descriptor
    ///
    /// # Errors
    /// * `UnknownEntity` - if the entity was never registered
    /// * `UnknownColumn` - if the entity has no such column
    pub fn column(&self, entity: &str, column: &str) -> Result<ColumnDescriptor> {
        self.columns(entity)?
            .into_iter()
            .find(|c| c.name == column)
            .ok_or_else(|| RelMapError::UnknownColumn {
                entity: entity.to_string(),
                column: column.to_string(),
            })
    }
}

fn invalid(schema: &EntitySchema, reason: impl Into<String>) -> RelMapError {
    RelMapError::InvalidSchema {
        entity: schema.name.to_string(),
        reason: reason.into(),
    }
}

fn validate_columns(
    schema: &EntitySchema,
    entities: &BTreeMap<&'static str, &'static EntitySchema>,
) -> Result<()> {
    if schema.columns.is_empty() {
        return Err(invalid(schema, "no columns declared"));
    }

    let mut seen = HashSet::new();
    for column in schema.columns {
        if !seen.insert(column.name) {
            return Err(invalid(
                schema,
                format!("column '{}' declared twice", column.name),
            ));
        }

        if let Some(fk) = &column.foreign_key {
            let target = entities
                .values()
                .find(|s| s.table == fk.table)
                .ok_or_else(|| {
                    invalid(
                        schema,
                        format!(
                            "column '{}' references unmapped table '{}'",
                            column.name, fk.table
                        ),
                    )
                })?;
            if target.column(fk.column).is_none() {
                return Err(invalid(
                    schema,
                    format!(
                        "column '{}' references missing column '{}.{}'",
                        column.name, fk.table, fk.column
                    ),
                ));
            }
        }
    }

    let pk = schema.primary_key();
    match pk.as_slice() {
        [column] if column.sql_type == SqlType::Integer => Ok(()),
        [column] => Err(invalid(
            schema,
            format!("primary key '{}' must be an integer", column.name),
        )),
        [] => Err(invalid(schema, "no primary key column")),
        _ => Err(invalid(schema, "composite primary keys are not supported")),
    }
}

fn validate_relationships(
    schema: &EntitySchema,
    entities: &BTreeMap<&'static str, &'static EntitySchema>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for rel in schema.relationships {
        if !seen.insert(rel.name) {
            return Err(invalid(
                schema,
                format!("relationship '{}' declared twice", rel.name),
            ));
        }
        if schema.column(rel.name).is_some() {
            return Err(invalid(
                schema,
                format!("relationship '{}' shadows a column", rel.name),
            ));
        }

        let target =
            entities
                .get(rel.target)
                .copied()
                .ok_or_else(|| RelMapError::UnknownEntity {
                    entity: rel.target.to_string(),
                })?;

        // The foreign key always lives on the many side.
        let (many, one) = match rel.kind {
            RelationshipKind::OneToMany => (target, schema),
            RelationshipKind::ManyToOne => (schema, target),
        };
        let has_fk = many
            .columns
            .iter()
            .any(|c| c.foreign_key.is_some_and(|fk| fk.table == one.table));
        if !has_fk {
            return Err(invalid(
                schema,
                format!(
                    "relationship '{}' needs a foreign key from '{}' to '{}'",
                    rel.name, many.table, one.table
                ),
            ));
        }

        if let Some(back) = rel.back_populates {
            let inverse = target.relationship(back).ok_or_else(|| {
                invalid(
                    schema,
                    format!(
                        "relationship '{}' back-populates missing '{}.{}'",
                        rel.name, target.name, back
                    ),
                )
            })?;
            let mirrored = inverse.target == schema.name
                && inverse.kind == rel.kind.inverse()
                && inverse.back_populates == Some(rel.name);
            if !mirrored {
                return Err(invalid(
                    schema,
                    format!(
                        "relationship '{}' and '{}.{}' are not declared as inverses",
                        rel.name, target.name, back
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Topological order over foreign keys; ties broken by entity name
fn resolve_creation_order(
    entities: &BTreeMap<&'static str, &'static EntitySchema>,
) -> Result<Vec<&'static str>> {
    let mut deps: BTreeMap<&'static str, BTreeSet<&'static str>> = BTreeMap::new();
    for schema in entities.values() {
        let targets = schema
            .columns
            .iter()
            .filter_map(|c| c.foreign_key)
            .filter(|fk| fk.table != schema.table)
            .filter_map(|fk| entities.values().find(|s| s.table == fk.table))
            .map(|s| s.name)
            .collect();
        deps.insert(schema.name, targets);
    }

    let mut order = Vec::with_capacity(deps.len());
    while !deps.is_empty() {
        let ready: Vec<_> = deps
            .iter()
            .filter(|(_, d)| d.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if ready.is_empty() {
            let entity = deps.keys().next().map(|n| n.to_string()).unwrap_or_default();
            return Err(RelMapError::InvalidSchema {
                entity,
                reason: "foreign keys form a cycle".to_string(),
            });
        }

        for name in ready {
            deps.remove(name);
            for d in deps.values_mut() {
                d.remove(name);
            }
            order.push(name);
        }
    }

    Ok(order)
}
