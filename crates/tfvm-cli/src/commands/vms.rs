//! Parsed VM listing

use anyhow::Result;
use tabled::Tabled;
use tfvm_lib::VirtualMachine;

use crate::output::{display_affinity, display_workload, print_warning, OutputFormat};

/// Row for the VM listing table
#[derive(Tabled)]
struct VmListRow {
    #[tabled(rename = "VM Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "vCPU")]
    cpu: u32,
    #[tabled(rename = "RAM (MB)")]
    ram: u64,
    #[tabled(rename = "Disk (GB)")]
    disk: u64,
    #[tabled(rename = "Affinity")]
    affinity: String,
    #[tabled(rename = "Datastore")]
    datastore: String,
    #[tabled(rename = "Workload")]
    workload: String,
}

/// List every parsed VM, in declaration order
pub fn list_vms(vms: &[VirtualMachine], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(vms)?);
        }
        OutputFormat::Table => {
            if vms.is_empty() {
                print_warning("No VMs found");
                return Ok(());
            }
            let rows: Vec<VmListRow> = vms
                .iter()
                .map(|vm| VmListRow {
                    name: vm.name.clone(),
                    host: vm.host_node.clone(),
                    role: vm.role.to_string(),
                    ip: vm.ip.clone(),
                    cpu: vm.cpu,
                    ram: vm.ram_dedicated_mb,
                    disk: vm.total_disk_gb(),
                    affinity: display_affinity(&vm.cpu_affinity),
                    datastore: vm.datastore_id.clone(),
                    workload: display_workload(vm.workload.as_deref()),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{table}");
            println!("\nTotal: {} VMs", vms.len());
        }
    }
    Ok(())
}
