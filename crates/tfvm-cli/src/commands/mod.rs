//! CLI command implementations

pub mod recommendations;
pub mod report;
pub mod vms;
