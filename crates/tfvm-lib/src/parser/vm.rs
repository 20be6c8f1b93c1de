//! Entity parsing: host blocks, VM blocks, and additional disks
//!
//! A role block (`master_vms` / `worker_vms`) has the shape
//!
//! ```text
//! master_vms = {
//!   "host-name" = {
//!     "vm-name" = {
//!       cpu = 2
//!       additional_disks = {
//!         "sata0" = { size = 100 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! The walk produces VMs in encounter order, so parsing identical input
//! twice yields an identical record list. A field-format error is fatal to
//! the single VM it belongs to; the VM is skipped with a recorded issue and
//! its siblings continue.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ParseError, ParseIssue};
use crate::models::{DiskSpec, VirtualMachine, VmRole};
use crate::parser::block::{find_named_block, named_children};
use crate::parser::{affinity, fields};

/// Parses every VM declared inside a role block.
///
/// Field-format errors are recorded in `issues` with host/VM context and
/// skip only the offending VM. A structural error anywhere below a host is
/// returned and aborts the file (the caller contributes zero further VMs
/// from it).
pub fn parse_role_block(
    role_block: &str,
    role: VmRole,
    file: &str,
    issues: &mut Vec<ParseIssue>,
) -> Result<Vec<VirtualMachine>, ParseError> {
    let mut vms = Vec::new();

    for (host, host_block) in named_children(role_block)? {
        for (vm_name, vm_block) in named_children(host_block)? {
            match parse_vm(vm_block, &vm_name, &host, role) {
                Ok(vm) => vms.push(vm),
                Err(error @ ParseError::UnterminatedBlock { .. }) => return Err(error),
                Err(error) => {
                    issues.push(ParseIssue {
                        file: file.to_string(),
                        scope: format!("host {host}, vm {vm_name}"),
                        error,
                    });
                }
            }
        }
    }

    debug!(file, role = %role, count = vms.len(), "parsed role block");
    Ok(vms)
}

/// Parses a single VM definition block.
///
/// Absent fields take their documented defaults; a block with no
/// recognizable fields still yields an all-defaults record. The affinity
/// spec is validated here so a malformed one surfaces at parse time with VM
/// context rather than later inside the analyzer.
fn parse_vm(
    vm_block: &str,
    name: &str,
    host: &str,
    role: VmRole,
) -> Result<VirtualMachine, ParseError> {
    let cpu_affinity = fields::string_field(vm_block, "cpu_affinity")?.unwrap_or_default();
    affinity::parse(&cpu_affinity)?;

    let cpu = match fields::int_field(vm_block, "cpu")? {
        Some(count) => u32::try_from(count).map_err(|_| ParseError::MalformedField {
            key: "cpu".to_string(),
            expected: "integer",
        })?,
        None => 0,
    };

    Ok(VirtualMachine {
        name: name.to_string(),
        host_node: host.to_string(),
        role,
        ip: fields::string_field(vm_block, "ip")?.unwrap_or_default(),
        cpu,
        cpu_affinity,
        numa: fields::bool_field(vm_block, "numa")?.unwrap_or(false),
        ram_dedicated_mb: fields::int_field(vm_block, "ram_dedicated")?.unwrap_or(0),
        disk_size_gb: fields::int_field(vm_block, "disk_size")?.unwrap_or(0),
        bandwidth_limit_mbps: fields::int_field(vm_block, "bandwidth_limit")?.unwrap_or(0),
        datastore_id: fields::string_field(vm_block, "datastore_id")?.unwrap_or_default(),
        workload: fields::string_field(vm_block, "workload")?,
        additional_disks: parse_additional_disks(vm_block)?,
    })
}

/// Parses the optional `additional_disks` sub-block into a name → size map.
fn parse_additional_disks(vm_block: &str) -> Result<HashMap<String, DiskSpec>, ParseError> {
    let mut disks = HashMap::new();

    let Some(disks_block) = find_named_block(vm_block, "additional_disks")? else {
        return Ok(disks);
    };
    for (disk_name, disk_block) in named_children(disks_block)? {
        let size_gb = fields::int_field(disk_block, "size")?.unwrap_or(0);
        disks.insert(disk_name, DiskSpec { size_gb });
    }

    Ok(disks)
}
