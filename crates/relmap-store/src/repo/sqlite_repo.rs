//! SQLite repository implementation
//!
//! Row-level reads and writes for Parents and Children. Functions take a
//! `&Connection`; a `Transaction` derefs to one, so the unit of work passes
//! its open transaction straight through.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use relmap_core::model::{Child, Parent};
use rusqlite::{Connection, OptionalExtension, Row};

/// SQLite repository for Parents and Children
pub struct SqliteRepo;

impl SqliteRepo {
    /// Persist a Parent row
    ///
    /// A Parent has no mutable columns, so an existing row is left as is.
    ///
    /// # Errors
    /// * `Persistence` - if the insert fails
    pub fn persist_parent(conn: &Connection, parent: &Parent) -> Result<()> {
        conn.execute(
            "INSERT INTO parent (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
            [parent.id()],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist a Child row with an explicit foreign-key value
    ///
    /// The caller decides which `parent_id` to write; the unit of work passes
    /// the relationship's current target rather than the stale column.
    ///
    /// # Errors
    /// * `ConstraintViolation` - if `parent_id` names no stored parent
    /// * `Persistence` - if the upsert fails
    pub fn persist_child(conn: &Connection, child_id: i64, parent_id: Option<i64>) -> Result<()> {
        conn.execute(
            "INSERT INTO child (id, parent_id) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET parent_id = excluded.parent_id",
            rusqlite::params![child_id, parent_id],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a Parent by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn get_parent(conn: &Connection, parent_id: i64) -> Result<Option<Parent>> {
        let result = conn
            .query_row("SELECT id FROM parent WHERE id = ?", [parent_id], |row| {
                Ok(Parent::new(row.get(0)?))
            })
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// Get a Child by id
    ///
    /// The returned Child carries the stored `parent_id`; its relationship
    /// back-reference is unresolved.
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn get_child(conn: &Connection, child_id: i64) -> Result<Option<Child>> {
        let result = conn
            .query_row(
                "SELECT id, parent_id FROM child WHERE id = ?",
                [child_id],
                child_from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// All Parents ordered by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn list_parents(conn: &Connection) -> Result<Vec<Parent>> {
        let mut stmt = conn
            .prepare("SELECT id FROM parent ORDER BY id")
            .map_err(from_rusqlite)?;

        let parents = stmt
            .query_map([], |row| Ok(Parent::new(row.get(0)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(parents)
    }

    /// All Children ordered by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn list_children(conn: &Connection) -> Result<Vec<Child>> {
        let mut stmt = conn
            .prepare("SELECT id, parent_id FROM child ORDER BY id")
            .map_err(from_rusqlite)?;

        let children = stmt
            .query_map([], child_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(children)
    }

    /// Children whose `parent_id` column holds `parent_id`, ordered by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn list_children_of(conn: &Connection, parent_id: i64) -> Result<Vec<Child>> {
        let mut stmt = conn
            .prepare("SELECT id, parent_id FROM child WHERE parent_id = ? ORDER BY id")
            .map_err(from_rusqlite)?;

        let children = stmt
            .query_map([parent_id], child_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(children)
    }
}

fn child_from_row(row: &Row<'_>) -> rusqlite::Result<Child> {
    Ok(Child::from_row(row.get(0)?, row.get(1)?))
}
