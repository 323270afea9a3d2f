use rusqlite::Connection;
use shopfeed_core::db::migrations::latest_version;
use shopfeed_core::db::{open_customer_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "products");
    assert_table_exists(&conn, "orders");
}

#[test]
fn opening_same_customer_store_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();

    let conn_first = open_customer_db(dir.path(), "customer1_dema").unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_customer_db(dir.path(), "customer1_dema").unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "products");
    assert_table_exists(&conn_second, "orders");
}

#[test]
fn migrations_never_touch_existing_rows() {
    let dir = tempfile::tempdir().unwrap();

    let conn = open_customer_db(dir.path(), "acme").unwrap();
    conn.execute(
        "INSERT INTO products (productId, name, category, subCategory)
         VALUES ('P1', 'Widget', 'Tools', 'Hand');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_customer_db(dir.path(), "acme").unwrap();
    let count: u64 = conn
        .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn distinct_customers_use_distinct_database_files() {
    let dir = tempfile::tempdir().unwrap();

    let conn_a = open_customer_db(dir.path(), "alpha").unwrap();
    conn_a
        .execute(
            "INSERT INTO products (productId, name, category, subCategory)
             VALUES ('P1', 'Widget', 'Tools', 'Hand');",
            [],
        )
        .unwrap();

    let conn_b = open_customer_db(dir.path(), "beta").unwrap();
    let count: u64 = conn_b
        .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0, "customer stores must not share state");

    assert!(dir.path().join("alpha.db").exists());
    assert!(dir.path().join("beta.db").exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();

    let conn = Connection::open(dir.path().join("future.db")).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_customer_db(dir.path(), "future").unwrap_err();
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
