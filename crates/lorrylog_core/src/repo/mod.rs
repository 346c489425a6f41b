//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the store contracts for repairs and users.
//! - Isolate SQLite query details from service/session orchestration.
//!
//! # Invariants
//! - Repositories only append and read; no update/delete paths exist.
//! - Repository constructors verify the schema they depend on.

pub mod error;
pub mod repair_repo;
pub mod user_repo;

use crate::db::schema::{check_table, TableShape};
use crate::db::DbError;
use error::{RepoError, RepoResult};
use rusqlite::Connection;

fn ensure_table_ready(conn: &Connection, shape: &TableShape) -> RepoResult<()> {
    check_table(conn, shape).map_err(|err| match err {
        DbError::MissingTable(table) => RepoError::MissingRequiredTable(table),
        DbError::MissingColumn { table, column } => {
            RepoError::MissingRequiredColumn { table, column }
        }
        other => RepoError::Db(other),
    })
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count {count} in {table}")))
}
