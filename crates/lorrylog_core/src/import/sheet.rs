//! Worksheet-to-payload mapping for repair imports.
//!
//! # Responsibility
//! - Open a workbook with `calamine` and read its first worksheet.
//! - Locate the five repair columns by header name and convert cells.
//!
//! # Invariants
//! - Header names match exactly; column order is irrelevant and extra columns
//!   are ignored.
//! - Text cells are kept verbatim; only `KM Reading` is coerced to an integer.
//! - Native spreadsheet dates become `YYYY-MM-DD`, honoring the workbook's
//!   1900 or 1904 date system. Duration cells are rejected.

use crate::model::repair::{NewRepair, REPAIR_DATE_FORMAT};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const VEHICLE_NUMBER_COLUMN: &str = "Vehicle Number";
pub const PART_NAME_COLUMN: &str = "Part Name";
pub const KM_READING_COLUMN: &str = "KM Reading";
pub const REPAIR_DATE_COLUMN: &str = "Repair Date";
pub const REPAIR_TYPE_COLUMN: &str = "Repair Type";

static EMPTY_CELL: Data = Data::Empty;

const REQUIRED_COLUMNS: [&str; 5] = [
    VEHICLE_NUMBER_COLUMN,
    PART_NAME_COLUMN,
    KM_READING_COLUMN,
    REPAIR_DATE_COLUMN,
    REPAIR_TYPE_COLUMN,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    Open(String),
    EmptyWorkbook,
    MissingHeader,
    MissingColumn(&'static str),
    /// `row` is the 1-based worksheet row.
    InvalidCell {
        row: usize,
        column: &'static str,
        message: String,
    },
}

impl Display for SheetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(message) => write!(f, "failed to open spreadsheet: {message}"),
            Self::EmptyWorkbook => write!(f, "spreadsheet has no worksheets"),
            Self::MissingHeader => write!(f, "spreadsheet has no header row"),
            Self::MissingColumn(column) => write!(f, "missing required column `{column}`"),
            Self::InvalidCell {
                row,
                column,
                message,
            } => write!(f, "row {row}, column `{column}`: {message}"),
        }
    }
}

impl Error for SheetError {}

/// Reads repair payloads from the first worksheet of `path`.
pub fn read_repair_rows(path: impl AsRef<Path>) -> Result<Vec<NewRepair>, SheetError> {
    let mut workbook =
        open_workbook_auto(path.as_ref()).map_err(|err| SheetError::Open(err.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::EmptyWorkbook)?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|err| SheetError::Open(err.to_string()))?;

    rows_from_range(&range)
}

/// Maps a worksheet range with a header row into repair payloads.
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<NewRepair>, SheetError> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();
    let header = rows.next().ok_or(SheetError::MissingHeader)?;
    let columns = ColumnMap::from_header(header)?;

    let mut repairs = Vec::new();
    for (offset, cells) in rows.enumerate() {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        // Header occupies the first row of the range.
        let sheet_row = first_row + offset + 2;
        repairs.push(columns.to_repair(cells, sheet_row)?);
    }

    Ok(repairs)
}

struct ColumnMap {
    vehicle_no: usize,
    part_name: usize,
    km_reading: usize,
    repair_date: usize,
    repair_type: usize,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Result<Self, SheetError> {
        let mut positions = [None; 5];
        for (index, cell) in header.iter().enumerate() {
            let Data::String(name) = cell else {
                continue;
            };
            if let Some(slot) = REQUIRED_COLUMNS.iter().position(|column| column == name) {
                positions[slot].get_or_insert(index);
            }
        }

        let mut resolved = [0; 5];
        for (slot, position) in positions.into_iter().enumerate() {
            resolved[slot] = position.ok_or(SheetError::MissingColumn(REQUIRED_COLUMNS[slot]))?;
        }

        Ok(Self {
            vehicle_no: resolved[0],
            part_name: resolved[1],
            km_reading: resolved[2],
            repair_date: resolved[3],
            repair_type: resolved[4],
        })
    }

    fn to_repair(&self, cells: &[Data], sheet_row: usize) -> Result<NewRepair, SheetError> {
        let cell = |index: usize| cells.get(index).unwrap_or(&EMPTY_CELL);

        Ok(NewRepair {
            vehicle_no: text_cell(cell(self.vehicle_no), sheet_row, VEHICLE_NUMBER_COLUMN)?,
            part_name: text_cell(cell(self.part_name), sheet_row, PART_NAME_COLUMN)?,
            km_reading: km_cell(cell(self.km_reading), sheet_row)?,
            repair_date: text_cell(cell(self.repair_date), sheet_row, REPAIR_DATE_COLUMN)?,
            repair_type: text_cell(cell(self.repair_type), sheet_row, REPAIR_TYPE_COLUMN)?,
        })
    }
}

fn text_cell(cell: &Data, row: usize, column: &'static str) -> Result<String, SheetError> {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_float(*value),
        Data::Bool(value) => if *value { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(value) => date_cell(value, row, column)?,
        Data::Error(err) => {
            return Err(SheetError::InvalidCell {
                row,
                column,
                message: format!("cell holds spreadsheet error {err:?}"),
            });
        }
    };
    Ok(text)
}

fn km_cell(cell: &Data, row: usize) -> Result<u32, SheetError> {
    let invalid = |message: String| SheetError::InvalidCell {
        row,
        column: KM_READING_COLUMN,
        message,
    };

    match cell {
        Data::Int(value) => u32::try_from(*value)
            .map_err(|_| invalid(format!("`{value}` is not a non-negative integer"))),
        Data::Float(value) => float_to_km(*value)
            .ok_or_else(|| invalid(format!("`{value}` is not a non-negative integer"))),
        Data::String(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(format!("`{value}` is not a non-negative integer"))),
        Data::Empty => Err(invalid("value is empty".to_string())),
        other => Err(invalid(format!("unsupported cell value {other:?}"))),
    }
}

// NaN and infinities have a NaN fraction, so the first check rejects them.
fn float_to_km(value: f64) -> Option<u32> {
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

// Whole numbers drop the `.0`; NaN and infinities render as `NaN`/`inf`.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn date_cell(
    value: &ExcelDateTime,
    row: usize,
    column: &'static str,
) -> Result<String, SheetError> {
    let invalid = |message: String| SheetError::InvalidCell {
        row,
        column,
        message,
    };

    if value.is_duration() {
        return Err(invalid(format!(
            "duration {} is not a calendar date",
            value.as_f64()
        )));
    }
    let datetime = value
        .as_datetime()
        .ok_or_else(|| invalid(format!("date serial {} is out of range", value.as_f64())))?;
    Ok(datetime.date().format(REPAIR_DATE_FORMAT).to_string())
}
