//! Repair event model.
//!
//! # Responsibility
//! - Define the stored `RepairRecord` shape and the insert payload.
//! - Define the fixed part/repair-type vocabularies used by manual entry.
//!
//! # Invariants
//! - `id` is assigned by the store, increases monotonically and is never
//!   reused.
//! - `repair_date` is persisted as text; manual entry always writes
//!   `YYYY-MM-DD`, imports keep the spreadsheet text.
//! - Duplicate records (same vehicle, part, date) are permitted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key for a repair row.
pub type RecordId = i64;

/// Date format written by manual entry.
pub const REPAIR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parts selectable in the manual entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartName {
    AirFilter,
    DieselFilter,
    Gearbox,
    Hub,
    KingPin,
    AdblueFilter,
    Others,
}

impl PartName {
    /// All parts in form display order.
    pub const ALL: [PartName; 7] = [
        PartName::AirFilter,
        PartName::DieselFilter,
        PartName::Gearbox,
        PartName::Hub,
        PartName::KingPin,
        PartName::AdblueFilter,
        PartName::Others,
    ];

    /// Label persisted in `repairs.part_name`.
    pub fn label(self) -> &'static str {
        match self {
            Self::AirFilter => "Air Filter",
            Self::DieselFilter => "Diesel Filter",
            Self::Gearbox => "Gearbox",
            Self::Hub => "Hub",
            Self::KingPin => "King Pin",
            Self::AdblueFilter => "Adblue Filter",
            Self::Others => "Others",
        }
    }

    /// Parses a label, case-insensitively. Spaces, `-` and `_` are
    /// interchangeable so `king-pin` and `King Pin` both resolve.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = fold_label(value);
        Self::ALL
            .into_iter()
            .find(|part| fold_label(part.label()) == wanted)
    }
}

impl Display for PartName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of work logged for a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairType {
    Repair,
    Replacement,
}

impl RepairType {
    pub const ALL: [RepairType; 2] = [RepairType::Repair, RepairType::Replacement];

    /// Label persisted in `repairs.repair_type`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Repair => "Repair",
            Self::Replacement => "Replacement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = fold_label(value);
        Self::ALL
            .into_iter()
            .find(|kind| fold_label(kind.label()) == wanted)
    }
}

impl Display for RepairType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Insert payload for the repair store.
///
/// Fields are stored verbatim. Bulk import builds this directly from
/// spreadsheet cells, so `part_name` and `repair_type` may be free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepair {
    pub vehicle_no: String,
    pub part_name: String,
    pub km_reading: u32,
    pub repair_date: String,
    pub repair_type: String,
}

/// Persisted repair event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairRecord {
    pub id: RecordId,
    pub vehicle_no: String,
    pub part_name: String,
    pub km_reading: u32,
    pub repair_date: String,
    pub repair_type: String,
}

impl RepairRecord {
    /// Returns the insert payload this record was created from.
    pub fn to_new_repair(&self) -> NewRepair {
        NewRepair {
            vehicle_no: self.vehicle_no.clone(),
            part_name: self.part_name.clone(),
            km_reading: self.km_reading,
            repair_date: self.repair_date.clone(),
            repair_type: self.repair_type.clone(),
        }
    }
}

/// Typed manual-entry form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairEntry {
    pub vehicle_no: String,
    pub part: PartName,
    pub km_reading: u32,
    pub repair_date: NaiveDate,
    pub repair_type: RepairType,
}

impl RepairEntry {
    /// Converts form input into the stored text representation.
    pub fn to_new_repair(&self) -> NewRepair {
        NewRepair {
            vehicle_no: self.vehicle_no.clone(),
            part_name: self.part.label().to_string(),
            km_reading: self.km_reading,
            repair_date: self.repair_date.format(REPAIR_DATE_FORMAT).to_string(),
            repair_type: self.repair_type.label().to_string(),
        }
    }
}

/// Rejected manual-entry input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairValidationError {
    InvalidRepairDate(String),
    UnknownPart(String),
    UnknownRepairType(String),
}

impl Display for RepairValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRepairDate(value) => {
                write!(f, "invalid repair date `{value}`; expected YYYY-MM-DD")
            }
            Self::UnknownPart(value) => {
                let labels = PartName::ALL.map(PartName::label).join(", ");
                write!(f, "unknown part `{value}`; expected one of: {labels}")
            }
            Self::UnknownRepairType(value) => {
                write!(f, "unknown repair type `{value}`; expected Repair or Replacement")
            }
        }
    }
}

impl Error for RepairValidationError {}

/// Parses a manual-entry date in `YYYY-MM-DD` form.
pub fn parse_repair_date(value: &str) -> Result<NaiveDate, RepairValidationError> {
    NaiveDate::parse_from_str(value.trim(), REPAIR_DATE_FORMAT)
        .map_err(|_| RepairValidationError::InvalidRepairDate(value.to_string()))
}

/// Parses a part label or fails with the accepted vocabulary.
pub fn parse_part_name(value: &str) -> Result<PartName, RepairValidationError> {
    PartName::parse(value).ok_or_else(|| RepairValidationError::UnknownPart(value.to_string()))
}

pub fn parse_repair_type(value: &str) -> Result<RepairType, RepairValidationError> {
    RepairType::parse(value)
        .ok_or_else(|| RepairValidationError::UnknownRepairType(value.to_string()))
}

fn fold_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
