// Integration tests for file-backed persistence
// Covers: a graph committed by one session is visible to the next

use relmap_core::model::{self, Child, EntityKey, Parent};
use relmap_core::ops::{append_child, set_parent, Store};
use relmap_store::{DatabaseTarget, EngineConfig, Session};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> EngineConfig {
    EngineConfig::default().with_database(DatabaseTarget::File(dir.path().join("relmap.db")))
}

#[test]
fn test_graph_survives_reopen() {
    // Given: A graph committed to a database file
    let dir = TempDir::new().unwrap();
    let registry = model::registry().unwrap();
    {
        let mut store = Store::new();
        store.insert_parent(Parent::new(1)).unwrap();
        store.insert_child(Child::new(5)).unwrap();
        store.insert_child(Child::new(7)).unwrap();
        set_parent(&mut store, 5, Some(1)).unwrap();
        append_child(&mut store, 1, 7).unwrap();

        let mut session = Session::open(&file_config(&dir), &registry).unwrap();
        session.add(&store, EntityKey::Child(5)).unwrap();
        session.commit(&mut store).unwrap();
    }

    // When: A new session opens the same file
    let mut session = Session::open(&file_config(&dir), &registry).unwrap();
    let store = session.load().unwrap();

    // Then: Rows and relationships are back
    let ids: Vec<_> = store
        .list_children()
        .iter()
        .map(|c| (c.id(), c.parent_key()))
        .collect();
    assert_eq!(ids, vec![(5, Some(1)), (7, Some(1))]);
    assert_eq!(store.get_parent(1).unwrap().child_ids(), &[5, 7]);
}

#[test]
fn test_reopen_does_not_recreate_tables() {
    let dir = TempDir::new().unwrap();
    let registry = model::registry().unwrap();

    let mut conn = relmap_store::db::connect(&file_config(&dir)).unwrap();
    let first = relmap_store::ddl::create_all(&mut conn, &registry).unwrap();
    drop(conn);

    let mut conn = relmap_store::db::connect(&file_config(&dir)).unwrap();
    let second = relmap_store::ddl::create_all(&mut conn, &registry).unwrap();

    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
}

#[test]
fn test_file_database_uses_wal() {
    let dir = TempDir::new().unwrap();
    let conn = relmap_store::db::connect(&file_config(&dir)).unwrap();

    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn test_detach_after_reload_survives_reopen() {
    // Given: Child(5) stored under Parent(1)
    let dir = TempDir::new().unwrap();
    let registry = model::registry().unwrap();
    {
        let mut store = Store::new();
        store.insert_parent(Parent::new(1)).unwrap();
        store.insert_child(Child::new(5)).unwrap();
        set_parent(&mut store, 5, Some(1)).unwrap();

        let mut session = Session::open(&file_config(&dir), &registry).unwrap();
        session.add(&store, EntityKey::Parent(1)).unwrap();
        session.commit(&mut store).unwrap();
    }

    // When: A later session loads the graph, detaches the child and commits
    {
        let mut session = Session::open(&file_config(&dir), &registry).unwrap();
        let mut store = session.load().unwrap();
        set_parent(&mut store, 5, None).unwrap();
        session.commit(&mut store).unwrap();
    }

    // Then: The stored row no longer points at the parent
    let mut session = Session::open(&file_config(&dir), &registry).unwrap();
    let store = session.load().unwrap();
    assert_eq!(store.get_child(5).unwrap().parent_id(), None);
    assert!(store.get_parent(1).unwrap().child_ids().is_empty());
}
