//! DDL generation

use relmap_core::schema::EntitySchema;

/// `CREATE TABLE` statement for an entity
///
/// Columns appear in declaration order, followed by the primary key and one
/// `FOREIGN KEY` clause per referencing column.
pub fn create_table_sql(schema: &EntitySchema) -> String {
    let mut lines: Vec<String> = schema
        .columns
        .iter()
        .map(|c| {
            if c.primary_key || !c.nullable {
                format!("{} {} NOT NULL", c.name, c.sql_type.ddl())
            } else {
                format!("{} {}", c.name, c.sql_type.ddl())
            }
        })
        .collect();

    let pk: Vec<&str> = schema.primary_key().iter().map(|c| c.name).collect();
    if !pk.is_empty() {
        lines.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }

    for column in schema.columns {
        if let Some(fk) = &column.foreign_key {
            lines.push(format!(
                "FOREIGN KEY({}) REFERENCES {} ({})",
                column.name, fk.table, fk.column
            ));
        }
    }

    format!("CREATE TABLE {} (\n    {}\n)", schema.table, lines.join(",\n    "))
}

/// `DROP TABLE` statement for an entity
pub fn drop_table_sql(schema: &EntitySchema) -> String {
    format!("DROP TABLE IF EXISTS {}", schema.table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmap_core::model::{Child, Parent};
    use relmap_core::schema::Entity;

    #[test]
    fn test_parent_table() {
        assert_eq!(
            create_table_sql(Parent::SCHEMA),
            "CREATE TABLE parent (\n    id INTEGER NOT NULL,\n    PRIMARY KEY (id)\n)"
        );
    }

    #[test]
    fn test_child_table_references_parent() {
        assert_eq!(
            create_table_sql(Child::SCHEMA),
            "CREATE TABLE child (\n    id INTEGER NOT NULL,\n    parent_id INTEGER,\n    \
             PRIMARY KEY (id),\n    FOREIGN KEY(parent_id) REFERENCES parent (id)\n)"
        );
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(drop_table_sql(Child::SCHEMA), "DROP TABLE IF EXISTS child");
    }
}
