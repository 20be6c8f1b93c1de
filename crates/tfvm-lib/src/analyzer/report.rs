//! Analysis report model
//!
//! The report is the sole contract handed to rendering collaborators. It is
//! assembled once per run from the parsed VM list and never mutated
//! afterwards. Every collection is emitted in a deterministic order: hosts
//! by name, CPU indices ascending, groups by key.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{NodeSpec, VmRole};
use crate::parser::affinity::CpuRange;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A policy recommendation or configuration problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

/// Utilization bucket for a percentage value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationLevel {
    Nominal,
    Warning,
    Critical,
}

impl UtilizationLevel {
    /// Buckets are inclusive at both boundaries: exactly 80% is still
    /// nominal and exactly 100% is still only a warning.
    pub fn from_pct(pct: f64) -> Self {
        if pct <= 80.0 {
            UtilizationLevel::Nominal
        } else if pct <= 100.0 {
            UtilizationLevel::Warning
        } else {
            UtilizationLevel::Critical
        }
    }
}

/// State of one CPU index on a host's affinity map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuState {
    Free,
    Used,
    Overlap,
}

/// One CPU index on a host: who claims it, and whether that is a conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSlot {
    pub index: u32,
    pub state: CpuState,
    /// Names of VMs whose affinity set includes this index
    pub claimed_by: Vec<String>,
}

/// Per-VM detail row within a host section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDetail {
    pub name: String,
    pub role: VmRole,
    pub cpu: u32,
    pub ram_dedicated_mb: u64,
    /// Raw affinity spec; empty when unpinned
    pub cpu_affinity: String,
    pub numa: bool,
    pub workload: Option<String>,
}

/// Aggregate utilization and affinity state for one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReport {
    pub host: String,
    pub spec: NodeSpec,
    /// True when no operator spec matched and the fallback default was used
    pub spec_is_default: bool,
    pub vms: Vec<VmDetail>,
    pub total_vcpus: u64,
    pub total_memory_mb: u64,
    pub total_disk_gb: u64,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub cpu_level: UtilizationLevel,
    pub memory_level: UtilizationLevel,
    /// One slot per CPU index, 0..cores
    pub cpu_map: Vec<CpuSlot>,
    /// CPU index → names of all VMs claiming it, only where ≥2 claim
    pub overlaps: BTreeMap<u32, Vec<String>>,
    pub free_ranges: Vec<CpuRange>,
    pub free_count: usize,
    /// VMs with no affinity configured, in declaration order
    pub unpinned_vms: Vec<String>,
    pub mixed_numa: bool,
}

/// One IP assignment row for the network section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAssignment {
    pub ip: String,
    pub vm: String,
    pub host: String,
}

/// An IP address claimed by more than one VM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateIp {
    pub ip: String,
    pub vms: Vec<String>,
}

/// A VM with a configured bandwidth cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthLimit {
    pub vm: String,
    pub limit_mbps: u64,
}

/// Storage consumed by one VM on a datastore (primary + additional disks)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreVm {
    pub vm: String,
    pub total_gb: u64,
}

/// Aggregate allocation on one backing storage pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreReport {
    pub datastore: String,
    pub total_gb: u64,
    pub vms: Vec<DatastoreVm>,
}

/// A named additional disk, for the storage section listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDisk {
    pub name: String,
    pub size_gb: u64,
}

/// A VM carrying additional disks beyond its primary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalDisks {
    pub vm: String,
    pub disks: Vec<NamedDisk>,
}

/// Full analysis output, recomputed from scratch each run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub vm_count: usize,
    /// Per-host sections, sorted by host name
    pub hosts: Vec<HostReport>,
    /// All IP assignments, sorted by address
    pub ip_assignments: Vec<IpAssignment>,
    /// Addresses claimed more than once, sorted by address
    pub duplicate_ips: Vec<DuplicateIp>,
    /// VMs with a bandwidth cap, sorted by name
    pub bandwidth_limited: Vec<BandwidthLimit>,
    /// Storage breakdown, sorted by datastore id
    pub datastores: Vec<DatastoreReport>,
    /// VMs with additional disks, in declaration order
    pub additional_disks: Vec<AdditionalDisks>,
    /// Policy recommendations in emission order
    pub findings: Vec<Finding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_boundaries_inclusive() {
        assert_eq!(UtilizationLevel::from_pct(0.0), UtilizationLevel::Nominal);
        assert_eq!(UtilizationLevel::from_pct(80.0), UtilizationLevel::Nominal);
        assert_eq!(UtilizationLevel::from_pct(80.01), UtilizationLevel::Warning);
        assert_eq!(UtilizationLevel::from_pct(100.0), UtilizationLevel::Warning);
        assert_eq!(
            UtilizationLevel::from_pct(100.01),
            UtilizationLevel::Critical
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }
}
