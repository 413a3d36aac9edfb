use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::{open_db, open_db_in_memory};
use bookshelf_core::{MemorySlot, SqliteSlot, StorageError, StorageSlot};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_slots");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteSlot::open(&path, "bookInventory") {
        Err(StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn sqlite_slot_is_empty_until_saved_and_then_overwrites() {
    let mut slot = SqliteSlot::open_in_memory("bookInventory").unwrap();
    assert_eq!(slot.load().unwrap(), None);

    slot.save("[1]").unwrap();
    slot.save("[2]").unwrap();
    assert_eq!(slot.load().unwrap().as_deref(), Some("[2]"));

    let rows: i64 = slot
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_slot_reports_empty_string_as_absent() {
    let mut slot = SqliteSlot::open_in_memory("bookInventory").unwrap();
    slot.save("").unwrap();
    assert_eq!(slot.load().unwrap(), None);
}

#[test]
fn sqlite_slot_value_survives_reopen_and_keys_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.db");

    let mut slot = SqliteSlot::open(&path, "bookInventory").unwrap();
    slot.save(r#"[{"id":"a"}]"#).unwrap();
    drop(slot);

    let reopened = SqliteSlot::open(&path, "bookInventory").unwrap();
    assert_eq!(reopened.key(), "bookInventory");
    assert_eq!(reopened.load().unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));
    drop(reopened);

    let other = SqliteSlot::open(&path, "otherInventory").unwrap();
    assert_eq!(other.load().unwrap(), None);
}

#[test]
fn memory_slot_counts_saves_and_hides_empty_values() {
    let mut slot = MemorySlot::with_value("");
    assert_eq!(slot.load().unwrap(), None);
    assert_eq!(slot.value(), Some(""));

    slot.save("[]").unwrap();
    assert_eq!(slot.load().unwrap().as_deref(), Some("[]"));
    assert_eq!(slot.save_count(), 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
