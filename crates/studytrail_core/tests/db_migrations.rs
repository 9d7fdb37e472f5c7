use rusqlite::Connection;
use studytrail_core::db::migrations::latest_version;
use studytrail_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "daily_records");
    assert_table_exists(&conn, "record_items");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("studytrail.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "daily_records");
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

#[test]
fn schema_rejects_unknown_item_category() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO daily_records (date, book) VALUES ('2025-09-01', 'b');",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO record_items (record_date, category, position, label)
         VALUES ('2025-09-01', 'bonus', 0, '1.1');",
        [],
    );
    assert!(result.is_err());
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

#[test]
fn record_items_relies_on_primary_key_for_lookups() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'index' AND tbl_name = 'record_items' AND sql IS NOT NULL;",
        )
        .unwrap();
    let explicit: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(explicit.is_empty(), "unexpected indexes: {explicit:?}");

    let plan: String = conn
        .query_row(
            "EXPLAIN QUERY PLAN
             SELECT category, label FROM record_items
             WHERE record_date = '2025-09-01'
             ORDER BY category ASC, position ASC;",
            [],
            |row| row.get(3),
        )
        .unwrap();
    assert!(plan.contains("sqlite_autoindex_record_items_1"), "plan: {plan}");
}
