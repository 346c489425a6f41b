//! SQLite storage: connection lifecycle, migrations and schema checks.
//!
//! A process holds one connection, opened through [`open_db`] or
//! [`open_db_in_memory`]. Both return only after every migration has run and
//! the resulting tables match [`schema::LATEST_SCHEMA`].

mod error;
pub mod migrations;
mod open;
pub mod schema;

pub use error::{DbError, DbResult};
pub use open::{close_db, open_db, open_db_in_memory};
pub use rusqlite::Connection;
