//! Static analysis over the parsed VM list
//!
//! A pure pass: the VM list and the operator-supplied host specs go in, an
//! [`AnalysisReport`] comes out. Nothing here performs I/O or mutates its
//! inputs, and running it twice over the same input produces the same
//! report (modulo the generation timestamp).

pub mod report;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::ParseError;
use crate::models::{NodeSpec, VirtualMachine, VmRole};
use crate::parser::affinity::{self, AffinitySet};

pub use report::{
    AdditionalDisks, AnalysisReport, BandwidthLimit, CpuSlot, CpuState, DatastoreReport,
    DatastoreVm, DuplicateIp, Finding, HostReport, IpAssignment, NamedDisk, Severity,
    UtilizationLevel, VmDetail,
};

/// Analyzes the assembled VM list against the operator's host specs.
///
/// Hosts missing from `nodes` fall back to [`NodeSpec::default`] and are
/// flagged with an informational finding, since their utilization
/// percentages are computed against assumed hardware.
///
/// Returns an error only for a malformed affinity spec, which the parser
/// normally rejects before a VM ever reaches this pass.
pub fn analyze(
    vms: &[VirtualMachine],
    nodes: &HashMap<String, NodeSpec>,
) -> Result<AnalysisReport, ParseError> {
    let mut by_host: BTreeMap<&str, Vec<&VirtualMachine>> = BTreeMap::new();
    for vm in vms {
        by_host.entry(vm.host_node.as_str()).or_default().push(vm);
    }
    debug!(vms = vms.len(), hosts = by_host.len(), "analyzing");

    let mut findings = Vec::new();
    let mut hosts = Vec::new();

    // Config-gap notes come first so approximate percentages are flagged
    // before any recommendation that depends on them
    for host in by_host.keys() {
        if !nodes.contains_key(*host) {
            let d = NodeSpec::default();
            findings.push(Finding {
                severity: Severity::Info,
                message: format!(
                    "Host '{host}' has no operator-supplied spec; utilization computed \
                     against defaults ({} socket, {} cores, {}MB).",
                    d.sockets, d.cores, d.memory_mb
                ),
            });
        }
    }

    for (host, host_vms) in &by_host {
        hosts.push(host_report(host, host_vms, nodes)?);
    }

    // Overlapping affinities, per host
    for host in &hosts {
        if !host.overlaps.is_empty() {
            findings.push(Finding {
                severity: Severity::Critical,
                message: format!(
                    "Host '{}' has overlapping CPU affinities. Fix immediately for CPU \
                     pinning to work correctly.",
                    host.host
                ),
            });
        }
    }

    // Missing affinities, per VM in declaration order
    for vm in vms {
        if vm.is_unpinned() {
            findings.push(Finding {
                severity: Severity::Warning,
                message: format!("VM '{}' has no CPU affinity set.", vm.name),
            });
        }
    }

    // NUMA consistency, per host
    for host in &hosts {
        if host.mixed_numa {
            findings.push(Finding {
                severity: Severity::Warning,
                message: format!(
                    "Host '{}' has mixed NUMA settings. Consider enabling NUMA for all \
                     VMs for consistency.",
                    host.host
                ),
            });
        }
    }

    // Overcommit, per host
    for host in &hosts {
        if host.total_vcpus > u64::from(host.spec.cores) {
            findings.push(Finding {
                severity: Severity::Warning,
                message: format!(
                    "Host '{}' has vCPU overcommit ({}/{}). This may cause performance \
                     issues with CPU pinning.",
                    host.host, host.total_vcpus, host.spec.cores
                ),
            });
        }
        if host.total_memory_mb > host.spec.memory_mb {
            findings.push(Finding {
                severity: Severity::Critical,
                message: format!(
                    "Host '{}' has memory overcommit ({}MB/{}MB). VMs may fail to start \
                     or be OOM killed.",
                    host.host, host.total_memory_mb, host.spec.memory_mb
                ),
            });
        }
    }

    // Single point of failure: every master on one host
    let mut masters_by_host: BTreeMap<&str, usize> = BTreeMap::new();
    for vm in vms.iter().filter(|vm| vm.role == VmRole::Master) {
        *masters_by_host.entry(vm.host_node.as_str()).or_default() += 1;
    }
    if masters_by_host.len() == 1 && masters_by_host.values().any(|&count| count > 1) {
        findings.push(Finding {
            severity: Severity::Warning,
            message: "All master nodes are on a single host. Consider distributing \
                      across hosts for HA."
                .to_string(),
        });
    }

    Ok(AnalysisReport {
        generated_at: chrono::Utc::now(),
        vm_count: vms.len(),
        hosts,
        ip_assignments: ip_assignments(vms),
        duplicate_ips: duplicate_ips(vms),
        bandwidth_limited: bandwidth_limited(vms),
        datastores: datastores(vms),
        additional_disks: additional_disks(vms),
        findings,
    })
}

/// Builds the utilization and affinity section for one host.
fn host_report(
    host: &str,
    host_vms: &[&VirtualMachine],
    nodes: &HashMap<String, NodeSpec>,
) -> Result<HostReport, ParseError> {
    let (spec, spec_is_default) = match nodes.get(host) {
        Some(spec) => (*spec, false),
        None => (NodeSpec::default(), true),
    };

    let total_vcpus: u64 = host_vms.iter().map(|vm| u64::from(vm.cpu)).sum();
    let total_memory_mb: u64 = host_vms.iter().map(|vm| vm.ram_dedicated_mb).sum();
    let total_disk_gb: u64 = host_vms.iter().map(|vm| vm.total_disk_gb()).sum();

    let cpu_pct = percentage(total_vcpus, u64::from(spec.cores));
    let memory_pct = percentage(total_memory_mb, spec.memory_mb);

    // CPU index → claimant VM names, in declaration order
    let mut claims: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for vm in host_vms {
        for cpu in affinity::parse(&vm.cpu_affinity)? {
            claims.entry(cpu).or_default().push(vm.name.clone());
        }
    }

    let overlaps: BTreeMap<u32, Vec<String>> = claims
        .iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(cpu, names)| (*cpu, names.clone()))
        .collect();

    let free: AffinitySet = (0..spec.cores)
        .filter(|cpu| !claims.contains_key(cpu))
        .collect();

    let cpu_map = (0..spec.cores)
        .map(|index| {
            let claimed_by = claims.get(&index).cloned().unwrap_or_default();
            let state = match claimed_by.len() {
                0 => CpuState::Free,
                1 => CpuState::Used,
                _ => CpuState::Overlap,
            };
            CpuSlot {
                index,
                state,
                claimed_by,
            }
        })
        .collect();

    let unpinned_vms = host_vms
        .iter()
        .filter(|vm| vm.is_unpinned())
        .map(|vm| vm.name.clone())
        .collect();

    let mixed_numa =
        host_vms.iter().any(|vm| vm.numa) && host_vms.iter().any(|vm| !vm.numa);

    let mut vms: Vec<VmDetail> = host_vms
        .iter()
        .map(|vm| VmDetail {
            name: vm.name.clone(),
            role: vm.role,
            cpu: vm.cpu,
            ram_dedicated_mb: vm.ram_dedicated_mb,
            cpu_affinity: vm.cpu_affinity.clone(),
            numa: vm.numa,
            workload: vm.workload.clone(),
        })
        .collect();
    vms.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(HostReport {
        host: host.to_string(),
        spec,
        spec_is_default,
        vms,
        total_vcpus,
        total_memory_mb,
        total_disk_gb,
        cpu_pct,
        memory_pct,
        cpu_level: UtilizationLevel::from_pct(cpu_pct),
        memory_level: UtilizationLevel::from_pct(memory_pct),
        cpu_map,
        overlaps,
        free_count: free.len(),
        free_ranges: affinity::compress_ranges(&free),
        unpinned_vms,
        mixed_numa,
    })
}

fn percentage(used: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    used as f64 / capacity as f64 * 100.0
}

fn ip_assignments(vms: &[VirtualMachine]) -> Vec<IpAssignment> {
    let mut rows: Vec<IpAssignment> = vms
        .iter()
        .map(|vm| IpAssignment {
            ip: vm.ip.clone(),
            vm: vm.name.clone(),
            host: vm.host_node.clone(),
        })
        .collect();
    rows.sort_by(|a, b| (&a.ip, &a.vm).cmp(&(&b.ip, &b.vm)));
    rows
}

fn duplicate_ips(vms: &[VirtualMachine]) -> Vec<DuplicateIp> {
    let mut by_ip: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for vm in vms {
        by_ip.entry(vm.ip.as_str()).or_default().push(vm.name.clone());
    }
    by_ip
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(ip, vms)| DuplicateIp {
            ip: ip.to_string(),
            vms,
        })
        .collect()
}

fn bandwidth_limited(vms: &[VirtualMachine]) -> Vec<BandwidthLimit> {
    let mut rows: Vec<BandwidthLimit> = vms
        .iter()
        .filter(|vm| vm.bandwidth_limit_mbps > 0)
        .map(|vm| BandwidthLimit {
            vm: vm.name.clone(),
            limit_mbps: vm.bandwidth_limit_mbps,
        })
        .collect();
    rows.sort_by(|a, b| a.vm.cmp(&b.vm));
    rows
}

fn datastores(vms: &[VirtualMachine]) -> Vec<DatastoreReport> {
    let mut by_datastore: BTreeMap<&str, Vec<DatastoreVm>> = BTreeMap::new();
    for vm in vms {
        by_datastore
            .entry(vm.datastore_id.as_str())
            .or_default()
            .push(DatastoreVm {
                vm: vm.name.clone(),
                total_gb: vm.total_disk_gb(),
            });
    }
    by_datastore
        .into_iter()
        .map(|(datastore, mut entries)| {
            entries.sort_by(|a, b| a.vm.cmp(&b.vm));
            DatastoreReport {
                datastore: datastore.to_string(),
                total_gb: entries.iter().map(|entry| entry.total_gb).sum(),
                vms: entries,
            }
        })
        .collect()
}

fn additional_disks(vms: &[VirtualMachine]) -> Vec<AdditionalDisks> {
    vms.iter()
        .filter(|vm| !vm.additional_disks.is_empty())
        .map(|vm| {
            let mut disks: Vec<NamedDisk> = vm
                .additional_disks
                .iter()
                .map(|(name, disk)| NamedDisk {
                    name: name.clone(),
                    size_gb: disk.size_gb,
                })
                .collect();
            disks.sort_by(|a, b| a.name.cmp(&b.name));
            AdditionalDisks {
                vm: vm.name.clone(),
                disks,
            }
        })
        .collect()
}
