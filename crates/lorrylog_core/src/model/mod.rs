//! Domain model for repair events and user credentials.
//!
//! # Responsibility
//! - Define the records persisted by the repair and user stores.
//! - Hold pure validation rules shared by services and the session gate.
//!
//! # Invariants
//! - Records are append-only: nothing in core updates or deletes them.

pub mod repair;
pub mod user;
