//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert credential rows and look them up by phone number.
//!
//! # Invariants
//! - `phone_number` is unique; a constraint hit maps to
//!   `RepoError::DuplicatePhoneNumber` so racing registrations from separate
//!   processes still fail cleanly.
//! - Lookups are exact and case-sensitive.

use super::error::{RepoError, RepoResult};
use super::{count_rows, ensure_table_ready};
use crate::db::schema::USERS;
use crate::model::user::{NewUser, User, UserId};
use rusqlite::{ffi, params, Connection, OptionalExtension};

/// Store interface for user credentials.
pub trait UserRepository {
    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId>;
    fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<User>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, &USERS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId> {
        let inserted = self.conn.execute(
            "INSERT INTO users (phone_number, password_hash) VALUES (?1, ?2);",
            params![user.phone_number.as_str(), user.password_hash.as_str()],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(RepoError::DuplicatePhoneNumber)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, phone_number, password_hash, created_at
                 FROM users
                 WHERE phone_number = ?1;",
                [phone_number],
                |row| {
                    Ok(User {
                        id: row.get("id")?,
                        phone_number: row.get("phone_number")?,
                        password_hash: row.get("password_hash")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, USERS.name)
    }
}
