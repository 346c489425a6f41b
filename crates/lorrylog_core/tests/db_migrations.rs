use lorrylog_core::db::migrations::latest_version;
use lorrylog_core::db::schema::{check_table, USERS};
use lorrylog_core::db::{close_db, open_db, open_db_in_memory, DbError};
use lorrylog_core::{RepoError, SqliteRepairRepository, SqliteUserRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "repairs");
    assert_table_exists(&conn, "users");
}

#[test]
fn reopening_file_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lorry_repair.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO repairs (vehicle_no, part_name, km_reading, repair_date, repair_type)
         VALUES ('TN01AB1234', 'Hub', 10, '2024-01-01', 'Repair');",
        [],
    )
    .unwrap();
    close_db(conn).unwrap();

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened), latest_version());
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM repairs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
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
fn recorded_version_without_tables_is_rejected_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hollow.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingTable("repairs")), "{err}");
}

#[test]
fn version_one_database_gains_users_table_and_keeps_repairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE repairs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vehicle_no TEXT NOT NULL,
            part_name TEXT NOT NULL,
            km_reading INTEGER NOT NULL,
            repair_date TEXT NOT NULL,
            repair_type TEXT NOT NULL
        );
        INSERT INTO repairs (vehicle_no, part_name, km_reading, repair_date, repair_type)
        VALUES ('KA05XY9999', 'Gearbox', 52000, '2023-11-02', 'Replacement');
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path).unwrap();
    assert_eq!(schema_version(&upgraded), latest_version());
    assert_table_exists(&upgraded, "users");
    let count: i64 = upgraded
        .query_row("SELECT COUNT(*) FROM repairs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn table_missing_a_column_is_reported_by_name() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, phone_number TEXT);")
        .unwrap();

    let err = check_table(&conn, &USERS).unwrap_err();
    assert!(matches!(
        err,
        DbError::MissingColumn {
            table: "users",
            column: "password_hash"
        }
    ));
}

#[test]
fn repositories_refuse_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let repair_err = SqliteRepairRepository::try_new(&conn)
        .err()
        .expect("repairs table is missing");
    assert!(matches!(repair_err, RepoError::MissingRequiredTable("repairs")));

    let user_err = SqliteUserRepository::try_new(&conn)
        .err()
        .expect("users table is missing");
    assert!(matches!(user_err, RepoError::MissingRequiredTable("users")));
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
