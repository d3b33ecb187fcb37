//! Table creation runner
//!
//! Creates mapped tables in foreign-key order inside one transaction and
//! keeps a checksum per table in `relmap_tables`.

use crate::ddl::checksums::compute_checksum;
use crate::ddl::generate::{create_table_sql, drop_table_sql};
use crate::errors::{checksum_mismatch, ddl_error, from_rusqlite, Result};
use relmap_core::schema::SchemaRegistry;
use relmap_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{Connection, OptionalExtension};

/// Bookkeeping row for a created table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub table_name: String,
    pub checksum: String,
    pub created_at: i64,
}

/// Create every registered table that does not exist yet
///
/// Idempotent: a table already recorded with the same checksum is skipped.
/// Returns the names of the tables created by this call, in creation order.
///
/// # Errors
/// * `ChecksumMismatch` - if a recorded table was created from different DDL
/// * `Persistence` - if SQLite rejects a statement
pub fn create_all(conn: &mut Connection, registry: &SchemaRegistry) -> Result<Vec<&'static str>> {
    log_op_start!("create_all");
    let start = std::time::Instant::now();

    let created = create_all_impl(conn, registry).map_err(|e| {
        log_op_error!(
            "create_all",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "create_all",
        duration_ms = start.elapsed().as_millis() as u64,
        created = created.len()
    );

    Ok(created)
}

fn create_all_impl(conn: &mut Connection, registry: &SchemaRegistry) -> Result<Vec<&'static str>> {
    create_bookkeeping_table(conn)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut created = Vec::new();

    for schema in registry.creation_order() {
        let sql = create_table_sql(schema);
        let checksum = compute_checksum(&sql);

        let recorded: Option<String> = tx
            .query_row(
                "SELECT checksum FROM relmap_tables WHERE table_name = ?",
                [schema.table],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        match recorded {
            Some(existing) if existing == checksum => continue,
            Some(existing) => return Err(checksum_mismatch(schema.table, &existing, &checksum)),
            None => {}
        }

        tx.execute_batch(&sql)
            .map_err(|e| ddl_error(schema.table, &e.to_string()))?;

        let now = chrono::Utc::now().timestamp();
        tx.execute(
            "INSERT INTO relmap_tables (table_name, checksum, created_at) VALUES (?, ?, ?)",
            rusqlite::params![schema.table, checksum, now],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(table = schema.table, checksum = %checksum, "Created table");
        created.push(schema.table);
    }

    tx.commit().map_err(from_rusqlite)?;

    Ok(created)
}

/// Drop every registered table, referrers first, and forget their checksums
///
/// # Errors
/// * `Persistence` - if SQLite rejects a statement
pub fn drop_all(conn: &mut Connection, registry: &SchemaRegistry) -> Result<()> {
    create_bookkeeping_table(conn)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    for schema in registry.creation_order().into_iter().rev() {
        tx.execute_batch(&drop_table_sql(schema))
            .map_err(from_rusqlite)?;
        tx.execute(
            "DELETE FROM relmap_tables WHERE table_name = ?",
            [schema.table],
        )
        .map_err(from_rusqlite)?;
    }
    tx.commit().map_err(from_rusqlite)?;

    Ok(())
}

/// Tables recorded in the bookkeeping table, ordered by name
///
/// # Errors
/// * `Persistence` - if the query fails
pub fn recorded_tables(conn: &Connection) -> Result<Vec<TableRecord>> {
    create_bookkeeping_table(conn)?;

    let mut stmt = conn
        .prepare("SELECT table_name, checksum, created_at FROM relmap_tables ORDER BY table_name")
        .map_err(from_rusqlite)?;

    let records = stmt
        .query_map([], |row| {
            Ok(TableRecord {
                table_name: row.get(0)?,
                checksum: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(records)
}

fn create_bookkeeping_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS relmap_tables (
            table_name TEXT PRIMARY KEY,
            checksum TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}
