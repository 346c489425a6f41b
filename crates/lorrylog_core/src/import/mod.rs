//! Bulk import of repair rows from spreadsheets.
//!
//! # Responsibility
//! - Map a parsed worksheet into repair payloads (`sheet`).
//! - Append payloads to the repair store as one unit (`importer`).
//!
//! # Invariants
//! - Rows are appended in file order.
//! - An import either persists every row or none of them.

pub mod importer;
pub mod sheet;
