//! Parser tests over complete configuration files

use crate::models::VmRole;
use crate::parser::parse_sources;

/// A realistic two-file cluster layout: masters pinned with affinity,
/// workers with extra disks and a bandwidth cap.
const MASTERS_TF: &str = r#"
module "k8s_masters" {
  source = "./modules/vm"

  master_vms = {
    "ayumu" = {
      "k8s-master-00" = {
        ip            = "10.20.0.10"
        cpu           = 2
        cpu_affinity  = "0-1"
        numa          = true
        ram_dedicated = 4096
        disk_size     = 32
        datastore_id  = "local-zfs"
        workload      = "control-plane"
      }
      "k8s-master-01" = {
        ip            = "10.20.0.11"
        cpu           = 2
        cpu_affinity  = "2-3"
        numa          = true
        ram_dedicated = 4096
        disk_size     = 32
        datastore_id  = "local-zfs"
        workload      = "control-plane"
      }
    }
  }
}
"#;

const WORKERS_TF: &str = r#"
worker_vms = {
  "ayumu" = {
    "k8s-worker-00" = {
      ip              = "10.20.0.20"
      cpu             = 6
      cpu_affinity    = "4-9"
      numa            = false
      ram_dedicated   = 16384
      disk_size       = 64
      bandwidth_limit = 200
      datastore_id    = "tank"
      additional_disks = {
        "sata0" = { size = 500 }
      }
    }
  }
  "hikari" = {
    "k8s-worker-01" = {
      ip            = "10.20.0.21"
      cpu           = 4
      ram_dedicated = 8192
      disk_size     = 64
      datastore_id  = "tank"
    }
  }
}
"#;

fn sources() -> Vec<(&'static str, &'static str)> {
    vec![
        ("k8s-masters.tf", MASTERS_TF),
        ("k8s-workers.tf", WORKERS_TF),
        ("provider.tf", "provider \"proxmox\" {}\n"),
    ]
}

#[test]
fn test_full_directory_parse() {
    let parsed = parse_sources(sources());

    assert!(parsed.issues.is_empty(), "issues: {:?}", parsed.issues);
    assert_eq!(parsed.vms.len(), 4);

    let names: Vec<_> = parsed.vms.iter().map(|vm| vm.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "k8s-master-00",
            "k8s-master-01",
            "k8s-worker-00",
            "k8s-worker-01"
        ]
    );

    let worker = &parsed.vms[2];
    assert_eq!(worker.role, VmRole::Worker);
    assert_eq!(worker.host_node, "ayumu");
    assert_eq!(worker.bandwidth_limit_mbps, 200);
    assert_eq!(worker.total_disk_gb(), 564);

    let last = &parsed.vms[3];
    assert_eq!(last.host_node, "hikari");
    assert!(last.is_unpinned());
    assert!(last.additional_disks.is_empty());
}

#[test]
fn test_parse_round_trip_determinism() {
    let first = parse_sources(sources());
    let second = parse_sources(sources());
    assert_eq!(first.vms, second.vms);
}

#[test]
fn test_nested_block_inside_vm_does_not_leak_keys() {
    // The masters module wrapper block must not produce phantom VMs, and
    // disk names must never surface as VM names.
    let parsed = parse_sources(vec![("workers.tf", WORKERS_TF)]);
    assert!(parsed.vms.iter().all(|vm| !vm.name.starts_with("sata")));
}

#[test]
fn test_brace_in_string_value_does_not_break_nesting() {
    let tricky = r#"
worker_vms = {
  "h" = {
    "vm-a" = {
      workload = "batch{nightly}"
      cpu      = 1
    }
    "vm-b" = { cpu = 2 }
  }
}
"#;
    let parsed = parse_sources(vec![("workers.tf", tricky)]);
    assert!(parsed.issues.is_empty());
    assert_eq!(parsed.vms.len(), 2);
    assert_eq!(parsed.vms[0].workload.as_deref(), Some("batch{nightly}"));
    assert_eq!(parsed.vms[1].cpu, 2);
}
