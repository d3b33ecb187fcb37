//! Hydration layer - loads stored rows back into a `Store`
//!
//! Rows arrive ordered by id. Relationships are re-linked through the
//! synchronizer, so a hydrated graph satisfies the same invariants as one
//! built in memory.

#![allow(clippy::result_large_err)]

use crate::errors::{from_domain, Result};
use crate::repo::SqliteRepo;
use relmap_core::model::EntityKey;
use relmap_core::ops::{relationship_ops, Store};
use relmap_core::rules::invariants::find_unresolved_foreign_keys;
use rusqlite::Connection;

/// Load every Parent and Child into a fresh Store
///
/// A child whose stored `parent_id` names no parent row keeps the column
/// value but gets no back-reference.
///
/// # Errors
/// * `Persistence` - if reading the tables fails
pub fn load_graph(conn: &Connection) -> Result<Store> {
    let mut store = Store::new();

    for parent in SqliteRepo::list_parents(conn)? {
        store
            .insert_parent(parent)
            .map_err(|e| from_domain("load_graph", e))?;
    }

    let children = SqliteRepo::list_children(conn)?;
    for child in &children {
        store
            .insert_child(child.clone())
            .map_err(|e| from_domain("load_graph", e))?;
    }

    for child in children {
        relink(&mut store, child.id(), child.parent_id())?;
    }

    for (child_id, parent_id) in find_unresolved_foreign_keys(&store) {
        tracing::warn!(
            child_id = child_id,
            parent_id = parent_id,
            "Stored foreign key names a missing parent"
        );
    }

    tracing::debug!(
        parents = store.list_parents().len(),
        children = store.list_children().len(),
        "Loaded object graph"
    );

    Ok(store)
}

/// Load one Parent and the children stored under it into `store`
///
/// Entities already in the store keep their in-memory state. Returns `false`
/// when no such parent row exists.
///
/// # Errors
/// * `Persistence` - if reading the tables fails
pub fn load_parent(conn: &Connection, parent_id: i64, store: &mut Store) -> Result<bool> {
    let Some(parent) = SqliteRepo::get_parent(conn, parent_id)? else {
        return Ok(false);
    };

    if !store.contains(EntityKey::Parent(parent_id)) {
        store
            .insert_parent(parent)
            .map_err(|e| from_domain("load_parent", e))?;
    }

    for child in SqliteRepo::list_children_of(conn, parent_id)? {
        if store.contains(EntityKey::Child(child.id())) {
            continue;
        }
        let child_id = child.id();
        store
            .insert_child(child)
            .map_err(|e| from_domain("load_parent", e))?;
        relink(store, child_id, Some(parent_id))?;
    }

    Ok(true)
}

fn relink(store: &mut Store, child_id: i64, parent_id: Option<i64>) -> Result<()> {
    match parent_id {
        Some(pid) if store.contains(EntityKey::Parent(pid)) => {
            relationship_ops::set_parent(store, child_id, Some(pid))
                .map_err(|e| from_domain("hydrate", e))
        }
        _ => Ok(()),
    }
}
