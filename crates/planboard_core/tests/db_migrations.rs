use planboard_core::db::migrations::latest_version;
use planboard_core::db::{open_db, open_db_in_memory, DbError};
use planboard_core::{KeyValueBackend, SqliteKeyValueBackend, StorageConfig, StorageManager};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn reopening_file_database_keeps_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planboard.db");

    let first = SqliteKeyValueBackend::new(open_db(&path).unwrap());
    first.set_raw("project_manager_projects", "[]").unwrap();
    drop(first);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let second = SqliteKeyValueBackend::new(conn);
    assert_eq!(
        second.get_raw("project_manager_projects").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn initialized_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.db");

    {
        let storage = StorageManager::new(
            SqliteKeyValueBackend::new(open_db(&path).unwrap()),
            StorageConfig::default(),
        );
        assert!(storage.initialize());
        assert!(storage
            .add_project(planboard_core::NewProject::named("Depot"))
            .is_some());
    }

    let storage = StorageManager::new(
        SqliteKeyValueBackend::new(open_db(&path).unwrap()),
        StorageConfig::default(),
    );
    assert!(storage.initialize());
    let projects = storage.get_projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Depot");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
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
