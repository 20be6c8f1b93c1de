//! Core data models for the VM configuration analyzer

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Role of a VM, derived from the file or block it was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmRole {
    Master,
    Worker,
}

impl std::fmt::Display for VmRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmRole::Master => write!(f, "master"),
            VmRole::Worker => write!(f, "worker"),
        }
    }
}

/// A VM definition extracted from a Terraform configuration block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub name: String,
    pub host_node: String,
    pub role: VmRole,
    pub ip: String,
    pub cpu: u32,
    /// Raw affinity spec like "0-3,6"; empty means unset
    pub cpu_affinity: String,
    pub numa: bool,
    pub ram_dedicated_mb: u64,
    pub disk_size_gb: u64,
    /// 0 means unlimited
    pub bandwidth_limit_mbps: u64,
    pub datastore_id: String,
    /// None when the field is absent; an empty string is a present-but-empty value
    pub workload: Option<String>,
    pub additional_disks: HashMap<String, DiskSpec>,
}

impl VirtualMachine {
    /// Primary disk plus all additional disks, in GB
    pub fn total_disk_gb(&self) -> u64 {
        self.disk_size_gb
            + self
                .additional_disks
                .values()
                .map(|d| d.size_gb)
                .sum::<u64>()
    }

    /// True when no CPU affinity is configured
    pub fn is_unpinned(&self) -> bool {
        self.cpu_affinity.is_empty()
    }
}

/// An additional disk attached to a VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpec {
    pub size_gb: u64,
}

/// Operator-supplied hardware description of a physical host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub sockets: u32,
    pub cores: u32,
    pub memory_mb: u64,
}

impl Default for NodeSpec {
    /// Fallback used when a host has no entry in the operator config
    fn default() -> Self {
        Self {
            sockets: 1,
            cores: 8,
            memory_mb: 32768,
        }
    }
}
