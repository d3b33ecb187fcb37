use std::collections::HashMap;
use std::fmt;

use crate::errors::{RelMapError, Result};
use crate::ops::Store;

/// A disagreement between the two sides of the parent/child relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Child points at a parent whose collection does not list it
    BackReferenceNotListed { child_id: i64, parent_id: i64 },
    /// Parent lists a child whose back-reference points elsewhere
    ListedWithoutBackReference {
        parent_id: i64,
        child_id: i64,
        back_reference: Option<i64>,
    },
    /// Child key appears more than once across collections
    DuplicateEntry { child_id: i64, parent_ids: Vec<i64> },
    /// Collection entry for a child that is not in the store
    MissingChild { parent_id: i64, child_id: i64 },
    /// Back-reference to a parent that is not in the store
    MissingParent { child_id: i64, parent_id: i64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BackReferenceNotListed {
                child_id,
                parent_id,
            } => write!(
                f,
                "child {} points to parent {} which does not list it",
                child_id, parent_id
            ),
            Violation::ListedWithoutBackReference {
                parent_id,
                child_id,
                back_reference,
            } => write!(
                f,
                "parent {} lists child {} whose parent is {:?}",
                parent_id, child_id, back_reference
            ),
            Violation::DuplicateEntry {
                child_id,
                parent_ids,
            } => write!(
                f,
                "child {} is listed more than once (parents {:?})",
                child_id, parent_ids
            ),
            Violation::MissingChild {
                parent_id,
                child_id,
            } => write!(f, "parent {} lists missing child {}", parent_id, child_id),
            Violation::MissingParent {
                child_id,
                parent_id,
            } => write!(f, "child {} points to missing parent {}", child_id, parent_id),
        }
    }
}

/// Find every asymmetric link in the store
///
/// Returns violations in a deterministic order (parents by key, then children by key).
pub fn find_violations(store: &Store) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut listings: HashMap<i64, Vec<i64>> = HashMap::new();

    for parent in store.list_parents() {
        for &child_id in parent.child_ids() {
            listings.entry(child_id).or_default().push(parent.id());

            match store.get_child(child_id) {
                Ok(child) if child.parent_key() != Some(parent.id()) => {
                    violations.push(Violation::ListedWithoutBackReference {
                        parent_id: parent.id(),
                        child_id,
                        back_reference: child.parent_key(),
                    });
                }
                Ok(_) => {}
                Err(_) => violations.push(Violation::MissingChild {
                    parent_id: parent.id(),
                    child_id,
                }),
            }
        }
    }

    for child in store.list_children() {
        if let Some(parent_ids) = listings.get(&child.id()) {
            if parent_ids.len() > 1 {
                violations.push(Violation::DuplicateEntry {
                    child_id: child.id(),
                    parent_ids: parent_ids.clone(),
                });
            }
        }

        let Some(parent_id) = child.parent_key() else {
            continue;
        };
        match store.get_parent(parent_id) {
            Ok(parent) if !parent.has_child(child.id()) => {
                violations.push(Violation::BackReferenceNotListed {
                    child_id: child.id(),
                    parent_id,
                });
            }
            Ok(_) => {}
            Err(_) => violations.push(Violation::MissingParent {
                child_id: child.id(),
                parent_id,
            }),
        }
    }

    violations
}

/// Fail if the store holds any relationship violation
///
/// # Errors
/// * `InvariantViolation` - describing every violation found
pub fn check_relationships(store: &Store) -> Result<()> {
    let violations = find_violations(store);
    if violations.is_empty() {
        return Ok(());
    }

    let reason = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(RelMapError::InvariantViolation { reason })
}

/// Children whose foreign-key column names a parent absent from the store
///
/// Returns (child_id, parent_id) pairs ordered by child key.
pub fn find_unresolved_foreign_keys(store: &Store) -> Vec<(i64, i64)> {
    store
        .list_children()
        .into_iter()
        .filter_map(|c| c.parent_id().map(|pid| (c.id(), pid)))
        .filter(|(_, pid)| store.get_parent(*pid).is_err())
        .collect()
}
