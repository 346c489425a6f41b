//! Repair repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append repair rows and list them per vehicle.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `append` performs no validation; callers validate form input.
//! - Vehicle lookup is an exact, case-sensitive match ordered by `id ASC`.
//! - Read paths reject invalid persisted state instead of masking it.

use super::error::{RepoError, RepoResult};
use super::{count_rows, ensure_table_ready};
use crate::db::schema::REPAIRS;
use crate::model::repair::{NewRepair, RecordId, RepairRecord};
use rusqlite::{params, Connection, Row};

const REPAIR_SELECT_SQL: &str = "SELECT
    id,
    vehicle_no,
    part_name,
    km_reading,
    repair_date,
    repair_type
FROM repairs";

/// Store interface for repair events.
pub trait RepairRepository {
    /// Persists one row and returns its store-assigned id.
    fn append(&self, repair: &NewRepair) -> RepoResult<RecordId>;
    /// Returns every record for `vehicle_no` in insertion order.
    fn list_by_vehicle(&self, vehicle_no: &str) -> RepoResult<Vec<RepairRecord>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed repair repository.
///
/// Accepts a plain connection or, through deref, an open transaction.
pub struct SqliteRepairRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepairRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, &REPAIRS)?;
        Ok(Self { conn })
    }
}

impl RepairRepository for SqliteRepairRepository<'_> {
    fn append(&self, repair: &NewRepair) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO repairs (
                vehicle_no,
                part_name,
                km_reading,
                repair_date,
                repair_type
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                repair.vehicle_no.as_str(),
                repair.part_name.as_str(),
                i64::from(repair.km_reading),
                repair.repair_date.as_str(),
                repair.repair_type.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_by_vehicle(&self, vehicle_no: &str) -> RepoResult<Vec<RepairRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REPAIR_SELECT_SQL}
             WHERE vehicle_no = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([vehicle_no])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_repair_row(row)?);
        }

        Ok(records)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, REPAIRS.name)
    }
}

fn parse_repair_row(row: &Row<'_>) -> RepoResult<RepairRecord> {
    let id: RecordId = row.get("id")?;
    let km_value: i64 = row.get("km_reading")?;
    let km_reading = u32::try_from(km_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid km reading `{km_value}` in repairs.km_reading for id {id}"
        ))
    })?;

    Ok(RepairRecord {
        id,
        vehicle_no: row.get("vehicle_no")?,
        part_name: row.get("part_name")?,
        km_reading,
        repair_date: row.get("repair_date")?,
        repair_type: row.get("repair_type")?,
    })
}
