//! Device state
//!
//! Shared status fields and the HTTP inbox, plus the applier's small
//! `Idle -> Processing -> Idle` state machine.

pub mod device;
pub mod machine;

pub use device::{DeviceSnapshot, DeviceState};
pub use machine::{ApplierEvent, ApplierState};
