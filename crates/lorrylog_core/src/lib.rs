//! Core logic for lorrylog, a repair log for lorry parts.
//! This crate owns storage, authentication and import invariants; the CLI
//! only renders and collects input.

pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use import::importer::{import_rows, ImportError, ImportReport};
pub use import::sheet::{read_repair_rows, rows_from_range, SheetError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::repair::{
    parse_part_name, parse_repair_date, parse_repair_type, NewRepair, PartName, RecordId,
    RepairEntry, RepairRecord, RepairType, RepairValidationError,
};
pub use model::user::{validate_password, validate_phone_number, CredentialError, User, UserId};
pub use repo::error::{RepoError, RepoResult};
pub use repo::repair_repo::{RepairRepository, SqliteRepairRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::repair_service::RepairService;
pub use service::user_service::{UserService, UserServiceError, DEFAULT_HASH_COST};
pub use session::{Session, SessionError, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
