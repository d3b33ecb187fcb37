#![allow(clippy::unwrap_used, clippy::expect_used)]

use relmap_core::errors::RelMapError;
use relmap_core::logging_facility::test_capture::init_test_capture;
use relmap_core::ops::{append_child, set_parent};
use relmap_core::{log_op_end, log_op_error, log_op_start, Child, Parent, Store};
use relmap_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_LINK, EVENT_START, EVENT_UNLINK};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let events = capture.events_for_op(op_name);
    assert!(
        events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)),
        "Should have captured a start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = RelMapError::ParentNotFound { parent_id: 1 };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field("err.code"), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_relationship_changes_emit_link_and_unlink() {
    let capture = init_test_capture();

    // Keys unique to this test so the shared capture buffer can be filtered
    let mut store = Store::new();
    store.insert_parent(Parent::new(9001)).unwrap();
    store.insert_parent(Parent::new(9002)).unwrap();
    store.insert_child(Child::new(9005)).unwrap();

    set_parent(&mut store, 9005, Some(9001)).unwrap();
    append_child(&mut store, 9002, 9005).unwrap();

    let for_child: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.field("child_id") == Some("9005"))
        .collect();

    let links = for_child
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_LINK))
        .count();
    let unlinks: Vec<_> = for_child
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_UNLINK))
        .collect();

    assert_eq!(links, 2);
    assert_eq!(unlinks.len(), 1);
    assert_eq!(unlinks[0].op.as_deref(), Some("append_child"));
}
