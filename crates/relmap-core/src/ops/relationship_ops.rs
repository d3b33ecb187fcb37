//! Bidirectional parent/child relationship bookkeeping
//!
//! `Parent.children` and `Child.parent` are inverse sides of one foreign key.
//! Every mutation goes through `link` or `unlink`, so whichever side the
//! caller touches, both sides agree afterwards:
//!
//! - a child's back-reference points to P exactly when P's collection lists it
//! - a child appears in at most one collection, at most once

use relmap_core_types::schema::{EVENT_LINK, EVENT_UNLINK};

use super::store::Store;
use crate::errors::Result;
use crate::model::{Child, Parent};

/// Assign `child.parent`
///
/// `Some(parent_id)` moves the child under that parent: it is removed from its
/// previous parent's collection (if any) and appended to the new one unless
/// already there. `None` detaches the child from its current parent.
///
/// # Errors
/// * `ChildNotFound` - if the child is not in the store
/// * `ParentNotFound` - if the target parent is not in the store
pub fn set_parent(store: &mut Store, child_id: i64, parent_id: Option<i64>) -> Result<()> {
    store.get_child(child_id)?;

    match parent_id {
        Some(pid) => {
            store.get_parent(pid)?;
            link(store, "set_parent", pid, child_id)
        }
        None => unlink(store, "set_parent", child_id),
    }
}

/// Append a child to `parent.children`
///
/// Sets the child's back-reference to this parent, detaching it from any
/// previous parent. Appending a child the collection already holds keeps its
/// position.
///
/// # Errors
/// * `ParentNotFound` - if the parent is not in the store
/// * `ChildNotFound` - if the child is not in the store
pub fn append_child(store: &mut Store, parent_id: i64, child_id: i64) -> Result<()> {
    store.get_parent(parent_id)?;
    store.get_child(child_id)?;

    link(store, "append_child", parent_id, child_id)
}

/// Remove a child from `parent.children`
///
/// Clears the child's back-reference. A child that is not in this parent's
/// collection is left untouched.
///
/// # Errors
/// * `ParentNotFound` - if the parent is not in the store
/// * `ChildNotFound` - if the child is not in the store
pub fn remove_child(store: &mut Store, parent_id: i64, child_id: i64) -> Result<()> {
    let parent = store.get_parent(parent_id)?;
    let listed = parent.has_child(child_id);
    let child = store.get_child(child_id)?;

    if !listed && child.parent != Some(parent_id) {
        return Ok(());
    }

    unlink(store, "remove_child", child_id)
}

/// Parent the child's back-reference points to
///
/// # Errors
/// * `ChildNotFound` - if the child is not in the store
pub fn parent_of(store: &Store, child_id: i64) -> Result<Option<&Parent>> {
    let child = store.get_child(child_id)?;
    match child.parent {
        Some(pid) => Ok(Some(store.get_parent(pid)?)),
        None => Ok(None),
    }
}

/// Children in the parent's collection, in insertion order
///
/// # Errors
/// * `ParentNotFound` - if the parent is not in the store
/// * `ChildNotFound` - if the collection references a missing child
pub fn children_of(store: &Store, parent_id: i64) -> Result<Vec<&Child>> {
    store
        .get_parent(parent_id)?
        .children
        .iter()
        .map(|id| store.get_child(*id))
        .collect()
}

/// Point `child_id` at `parent_id` on both sides
///
/// Callers verify both keys exist.
fn link(store: &mut Store, op: &str, parent_id: i64, child_id: i64) -> Result<()> {
    let current = store.get_child(child_id)?.parent;

    if current == Some(parent_id) && store.get_parent(parent_id)?.has_child(child_id) {
        return Ok(());
    }

    if current != Some(parent_id) {
        unlink(store, op, child_id)?;
    }

    store.get_parent_mut(parent_id)?.push_child(child_id);
    store.get_child_mut(child_id)?.parent = Some(parent_id);

    tracing::debug!(
        component = module_path!(),
        op = op,
        event = EVENT_LINK,
        parent_id = parent_id,
        child_id = child_id,
    );

    Ok(())
}

/// Detach `child_id` from whatever parent holds it
///
/// Also scrubs the key from any collection that lists it, so a half-linked
/// pair is repaired rather than left dangling.
fn unlink(store: &mut Store, op: &str, child_id: i64) -> Result<()> {
    let previous = store.get_child_mut(child_id)?.parent.take();

    let mut touched = false;
    for parent in store.parents.values_mut() {
        if parent.has_child(child_id) {
            parent.remove_child(child_id);
            touched = true;
        }
    }

    if previous.is_some() || touched {
        tracing::debug!(
            component = module_path!(),
            op = op,
            event = EVENT_UNLINK,
            parent_id = previous,
            child_id = child_id,
        );
    }

    Ok(())
}
