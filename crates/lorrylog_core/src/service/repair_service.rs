//! Repair use-case service.
//!
//! # Responsibility
//! - Record manual form entries and serve per-vehicle history.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::repair::{NewRepair, RecordId, RepairEntry, RepairRecord};
use crate::repo::error::RepoResult;
use crate::repo::repair_repo::RepairRepository;
use log::info;

/// Use-case service wrapper for the repair store.
pub struct RepairService<R: RepairRepository> {
    repo: R,
}

impl<R: RepairRepository> RepairService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records one typed form entry.
    ///
    /// # Contract
    /// - Labels and the `YYYY-MM-DD` date are derived from the typed entry.
    /// - Returns the store-assigned record id.
    pub fn record_repair(&self, entry: &RepairEntry) -> RepoResult<RecordId> {
        self.append(&entry.to_new_repair())
    }

    /// Appends a raw payload verbatim.
    pub fn append(&self, repair: &NewRepair) -> RepoResult<RecordId> {
        let record_id = self.repo.append(repair)?;
        info!("event=repair_append module=service status=ok record_id={record_id}");
        Ok(record_id)
    }

    /// Returns every record for a vehicle, oldest first. Unknown vehicles
    /// yield an empty list.
    pub fn history(&self, vehicle_no: &str) -> RepoResult<Vec<RepairRecord>> {
        let records = self.repo.list_by_vehicle(vehicle_no)?;
        info!(
            "event=repair_history module=service status=ok result_count={}",
            records.len()
        );
        Ok(records)
    }

    pub fn record_count(&self) -> RepoResult<u64> {
        self.repo.count()
    }
}
