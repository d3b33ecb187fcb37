mod common;

use common::{child_ids, store_with};
use relmap_core::{
    ops::{append_child, children_of, parent_of, remove_child, set_parent},
    rules::find_violations,
    RelMapError,
};

// ===== SET_PARENT TESTS =====

#[test]
fn test_set_parent_links_both_sides() {
    let mut store = store_with(&[1], &[5]);

    set_parent(&mut store, 5, Some(1)).unwrap();

    assert_eq!(parent_of(&store, 5).unwrap().unwrap().id(), 1);
    assert!(store.get_parent(1).unwrap().has_child(5));
}

#[test]
fn test_set_parent_twice_is_idempotent() {
    let mut store = store_with(&[1], &[5]);

    set_parent(&mut store, 5, Some(1)).unwrap();
    set_parent(&mut store, 5, Some(1)).unwrap();

    assert_eq!(child_ids(&store, 1), vec![5]);
}

#[test]
fn test_set_parent_reassignment_moves_child() {
    // Given: child 5 under parent 1
    let mut store = store_with(&[1, 2], &[5]);
    set_parent(&mut store, 5, Some(1)).unwrap();

    // When: it is reassigned to parent 2
    set_parent(&mut store, 5, Some(2)).unwrap();

    // Then: parent 1 no longer lists it and parent 2 does
    assert!(child_ids(&store, 1).is_empty());
    assert_eq!(child_ids(&store, 2), vec![5]);
    assert_eq!(parent_of(&store, 5).unwrap().unwrap().id(), 2);
}

#[test]
fn test_set_parent_unknown_parent_fails() {
    let mut store = store_with(&[1], &[5]);

    let result = set_parent(&mut store, 5, Some(42));

    assert!(matches!(
        result,
        Err(RelMapError::ParentNotFound { parent_id: 42 })
    ));
    assert!(parent_of(&store, 5).unwrap().is_none());
}

#[test]
fn test_set_parent_unknown_child_fails() {
    let mut store = store_with(&[1], &[]);

    let result = set_parent(&mut store, 5, Some(1));

    assert!(matches!(
        result,
        Err(RelMapError::ChildNotFound { child_id: 5 })
    ));
    assert!(child_ids(&store, 1).is_empty());
}

// ===== APPEND_CHILD TESTS =====

#[test]
fn test_append_child_sets_back_reference() {
    let mut store = store_with(&[1], &[7]);

    append_child(&mut store, 1, 7).unwrap();

    assert_eq!(parent_of(&store, 7).unwrap().unwrap().id(), 1);
}

#[test]
fn test_append_child_steals_from_previous_parent() {
    let mut store = store_with(&[1, 2], &[5, 7]);
    append_child(&mut store, 1, 5).unwrap();
    append_child(&mut store, 1, 7).unwrap();

    append_child(&mut store, 2, 5).unwrap();

    assert_eq!(child_ids(&store, 1), vec![7]);
    assert_eq!(child_ids(&store, 2), vec![5]);
    assert!(find_violations(&store).is_empty());
}

#[test]
fn test_append_existing_child_keeps_position() {
    let mut store = store_with(&[1], &[5, 7]);
    append_child(&mut store, 1, 5).unwrap();
    append_child(&mut store, 1, 7).unwrap();

    append_child(&mut store, 1, 5).unwrap();

    assert_eq!(child_ids(&store, 1), vec![5, 7]);
}

// ===== REMOVE_CHILD TESTS =====

#[test]
fn test_remove_child_clears_back_reference() {
    let mut store = store_with(&[1], &[5, 7]);
    append_child(&mut store, 1, 5).unwrap();
    append_child(&mut store, 1, 7).unwrap();

    remove_child(&mut store, 1, 5).unwrap();

    assert_eq!(child_ids(&store, 1), vec![7]);
    assert!(parent_of(&store, 5).unwrap().is_none());
}

// ===== MIXED SCENARIO =====

#[test]
fn test_both_directions_produce_ordered_children() {
    // Given: Parent(1), Child(5), Child(7)
    let mut store = store_with(&[1], &[5, 7]);

    // When: child.parent = parent; parent.children.append(child2)
    set_parent(&mut store, 5, Some(1)).unwrap();
    append_child(&mut store, 1, 7).unwrap();

    // Then: children are [5, 7] and child's parent is 1
    let ids: Vec<i64> = children_of(&store, 1)
        .unwrap()
        .iter()
        .map(|c| c.id())
        .collect();
    assert_eq!(ids, vec![5, 7]);
    assert_eq!(parent_of(&store, 5).unwrap().unwrap().id(), 1);
}

#[test]
fn test_foreign_key_column_waits_for_flush() {
    let mut store = store_with(&[1], &[5]);

    set_parent(&mut store, 5, Some(1)).unwrap();

    let child = store.get_child(5).unwrap();
    assert_eq!(child.parent_key(), Some(1));
    assert_eq!(child.parent_id(), None);
    assert!(child.is_fk_stale());
}
