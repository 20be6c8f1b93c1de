//! CLI integration tests

use std::fs;
use std::process::Command;

fn tfvm(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "tfvm-cli", "--"])
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = tfvm(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Analyze Terraform VM configurations"),
        "Should show app description"
    );
    assert!(stdout.contains("report"), "Should show report command");
    assert!(stdout.contains("vms"), "Should show vms command");
    assert!(
        stdout.contains("recommendations"),
        "Should show recommendations command"
    );
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = tfvm(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("tfvm"), "Should show binary name");
}

/// A directory with no VM declarations is a hard exit
#[test]
fn test_zero_vms_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("provider.tf"), "provider \"proxmox\" {}\n").unwrap();

    let output = tfvm(&["--dir", dir.path().to_str().unwrap(), "vms"]);
    assert!(!output.status.success(), "zero VMs should fail the run");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no VMs found"), "stderr: {stderr}");
}

/// End-to-end: parse a small cluster and emit the JSON report
#[test]
fn test_report_json_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("masters.tf"),
        r#"
master_vms = {
  "ayumu" = {
    "k8s-master-00" = {
      ip            = "10.0.0.10"
      cpu           = 2
      cpu_affinity  = "0-1"
      ram_dedicated = 4096
      disk_size     = 32
      datastore_id  = "local-zfs"
    }
    "k8s-master-01" = {
      ip            = "10.0.0.10"
      cpu           = 2
      cpu_affinity  = "1-2"
      ram_dedicated = 4096
      disk_size     = 32
      datastore_id  = "local-zfs"
    }
  }
}
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("nodes.toml"),
        "[nodes.ayumu]\nsockets = 1\ncores = 16\nmemory_mb = 61440\n",
    )
    .unwrap();

    let output = tfvm(&[
        "--dir",
        dir.path().to_str().unwrap(),
        "--nodes",
        dir.path().join("nodes.toml").to_str().unwrap(),
        "--format",
        "json",
        "report",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should be valid JSON");

    assert_eq!(report["vm_count"], 2);
    assert_eq!(report["hosts"][0]["host"], "ayumu");
    // Both VMs claim CPU 1
    assert_eq!(report["hosts"][0]["overlaps"]["1"][0], "k8s-master-00");
    assert_eq!(report["hosts"][0]["overlaps"]["1"][1], "k8s-master-01");
    // Shared IP is exactly one duplicate finding
    assert_eq!(report["duplicate_ips"].as_array().unwrap().len(), 1);
    assert_eq!(report["duplicate_ips"][0]["ip"], "10.0.0.10");
    // Overlap recommendation is present and critical
    let findings = report["findings"].as_array().unwrap();
    assert!(findings
        .iter()
        .any(|f| f["severity"] == "critical"
            && f["message"].as_str().unwrap().contains("overlapping")));
}

/// The vms listing parses worker files discovered by content
#[test]
fn test_vms_listing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cluster.tf"),
        r#"
worker_vms = {
  "hikari" = {
    "k8s-worker-00" = {
      ip  = "10.0.0.20"
      cpu = 4
    }
  }
}
"#,
    )
    .unwrap();

    let output = tfvm(&["--dir", dir.path().to_str().unwrap(), "--format", "json", "vms"]);
    assert!(output.status.success());

    let vms: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(vms.as_array().unwrap().len(), 1);
    assert_eq!(vms[0]["name"], "k8s-worker-00");
    assert_eq!(vms[0]["host_node"], "hikari");
    assert_eq!(vms[0]["role"], "worker");
}
