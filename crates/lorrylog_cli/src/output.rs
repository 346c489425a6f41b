//! User-facing message text.

use lorrylog_core::{NewRepair, RepairRecord};

pub fn registered(phone: &str) -> String {
    format!("Registered and logged in as {phone}")
}

pub fn added(repair: &NewRepair) -> String {
    format!(
        "Data added for Vehicle {} - {} ({})",
        repair.vehicle_no, repair.part_name, repair.repair_type
    )
}

pub fn uploaded(inserted: usize) -> String {
    format!("Data uploaded successfully! {inserted} record(s) added.")
}

pub fn history(vehicle_no: &str, records: &[RepairRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec![format!("No records found for vehicle: {vehicle_no}")];
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("Repair history for vehicle: {vehicle_no}"));
    lines.extend(records.iter().map(|record| {
        format!(
            "Part: {}, KM: {}, Date: {}, Type: {}",
            record.part_name, record.km_reading, record.repair_date, record.repair_type
        )
    }));
    lines
}
