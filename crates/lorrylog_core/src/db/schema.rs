//! Table shapes the stores depend on, and checks against a live connection.

use super::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
pub struct TableShape {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const REPAIRS: TableShape = TableShape {
    name: "repairs",
    columns: &[
        "id",
        "vehicle_no",
        "part_name",
        "km_reading",
        "repair_date",
        "repair_type",
    ],
};

pub const USERS: TableShape = TableShape {
    name: "users",
    columns: &["id", "phone_number", "password_hash", "created_at"],
};

/// Every table present at the latest migration version.
pub const LATEST_SCHEMA: [TableShape; 2] = [REPAIRS, USERS];

/// Fails with `MissingTable`/`MissingColumn` when `shape` is not fully present.
pub fn check_table(conn: &Connection, shape: &TableShape) -> DbResult<()> {
    if !table_exists(conn, shape.name)? {
        return Err(DbError::MissingTable(shape.name));
    }

    let present = table_columns(conn, shape.name)?;
    for &column in shape.columns {
        if !present.iter().any(|name| name == column) {
            return Err(DbError::MissingColumn {
                table: shape.name,
                column,
            });
        }
    }

    Ok(())
}

pub fn check_latest_schema(conn: &Connection) -> DbResult<()> {
    LATEST_SCHEMA
        .iter()
        .try_for_each(|shape| check_table(conn, shape))
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
