// Integration tests for table creation
// Covers: creation order, idempotency, checksum drift, foreign key enforcement

use relmap_core::errors::ExErrorKind;
use relmap_core::model;
use relmap_store::ddl::{create_all, recorded_tables};
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", true).unwrap();
    conn
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_create_all_creates_mapped_tables() {
    // Given: An empty database
    let mut conn = setup_test_db();
    let registry = model::registry().unwrap();

    // When: Tables are created
    let created = create_all(&mut conn, &registry).unwrap();

    // Then: The referenced table comes first
    assert_eq!(created, vec!["parent", "child"]);
    assert_eq!(table_names(&conn), vec!["child", "parent", "relmap_tables"]);
}

#[test]
fn test_create_all_records_checksums() {
    let mut conn = setup_test_db();
    create_all(&mut conn, &model::registry().unwrap()).unwrap();

    let records = recorded_tables(&conn).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.table_name.as_str()).collect();
    assert_eq!(names, vec!["child", "parent"]);
    assert!(records.iter().all(|r| r.checksum.len() == 64));
}

#[test]
fn test_create_all_twice_keeps_rows() {
    // Given: Tables already created and holding a row
    let mut conn = setup_test_db();
    let registry = model::registry().unwrap();
    create_all(&mut conn, &registry).unwrap();
    conn.execute("INSERT INTO parent (id) VALUES (1)", []).unwrap();

    // When: Creation runs again
    let created = create_all(&mut conn, &registry).unwrap();

    // Then: Nothing is created and the row survives
    assert!(created.is_empty());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM parent", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_drifted_table_is_rejected() {
    // Given: A table recorded with a different checksum
    let mut conn = setup_test_db();
    let registry = model::registry().unwrap();
    create_all(&mut conn, &registry).unwrap();
    conn.execute(
        "UPDATE relmap_tables SET checksum = 'stale' WHERE table_name = 'child'",
        [],
    )
    .unwrap();

    // When: Creation runs again
    let err = create_all(&mut conn, &registry).unwrap_err();

    // Then: The mismatch is reported
    assert_eq!(err.kind(), ExErrorKind::ChecksumMismatch);
    assert!(err.message().contains("child"));
}

#[test]
fn test_foreign_key_enforced_after_creation() {
    let mut conn = setup_test_db();
    create_all(&mut conn, &model::registry().unwrap()).unwrap();

    let result = conn.execute("INSERT INTO child (id, parent_id) VALUES (5, 1)", []);
    assert!(result.is_err(), "Child may not reference a missing parent");

    conn.execute("INSERT INTO child (id, parent_id) VALUES (6, NULL)", [])
        .unwrap();
}
