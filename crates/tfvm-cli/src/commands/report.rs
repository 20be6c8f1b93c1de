//! Full analysis report rendering
//!
//! Prints the five report sections: node utilization, CPU affinity,
//! network, storage, and recommendations.

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;
use tfvm_lib::analyzer::{AnalysisReport, HostReport};

use crate::output::{
    color_pct, color_severity, display_affinity, display_workload, format_memory_gb,
    print_header, render_cpu_map, OutputFormat,
};

/// Row for the per-host VM detail table
#[derive(Tabled)]
struct VmRow {
    #[tabled(rename = "VM Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "vCPU")]
    cpu: u32,
    #[tabled(rename = "RAM (MB)")]
    ram: u64,
    #[tabled(rename = "Affinity")]
    affinity: String,
    #[tabled(rename = "NUMA")]
    numa: bool,
    #[tabled(rename = "Workload")]
    workload: String,
}

/// Row for the IP allocation table
#[derive(Tabled)]
struct IpRow {
    #[tabled(rename = "IP Address")]
    ip: String,
    #[tabled(rename = "VM Name")]
    vm: String,
    #[tabled(rename = "Host")]
    host: String,
}

/// Render the full report
pub fn show_report(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
        OutputFormat::Table => {
            print_table_report(report);
            Ok(())
        }
    }
}

fn print_table_report(report: &AnalysisReport) {
    println!("\n{}", "=".repeat(80).bold());
    println!("{}", "VM RESOURCE ANALYSIS REPORT".cyan().bold());
    println!("{}", "=".repeat(80).bold());

    print_header("1. OVERALL NODE UTILIZATION");
    for host in &report.hosts {
        print_host_utilization(host);
    }

    print_header("2. CPU AFFINITY ANALYSIS");
    for host in &report.hosts {
        print_host_affinity(host);
    }

    print_header("3. NETWORK ANALYSIS");
    print_network(report);

    print_header("4. STORAGE ANALYSIS");
    print_storage(report);

    print_header("5. RECOMMENDATIONS");
    print_recommendations(report);

    println!("\n{}\n", "=".repeat(80).bold());
}

fn print_host_utilization(host: &HostReport) {
    let default_note = if host.spec_is_default {
        " [default spec]".yellow().to_string()
    } else {
        String::new()
    };
    println!(
        "\n{} ({} socket, {} cores, {} RAM){}",
        format!("Host: {}", host.host).bold(),
        host.spec.sockets,
        host.spec.cores,
        format_memory_gb(host.spec.memory_mb),
        default_note,
    );
    println!("  VMs: {}", host.vms.len());
    println!(
        "  vCPUs: {}/{} ({})",
        host.total_vcpus,
        host.spec.cores,
        color_pct(host.cpu_pct, host.cpu_level)
    );
    println!(
        "  Memory: {}MB/{}MB ({})",
        host.total_memory_mb,
        host.spec.memory_mb,
        color_pct(host.memory_pct, host.memory_level)
    );
    println!("  Total Disk: {}GB", host.total_disk_gb);

    let rows: Vec<VmRow> = host
        .vms
        .iter()
        .map(|vm| VmRow {
            name: vm.name.clone(),
            role: vm.role.to_string(),
            cpu: vm.cpu,
            ram: vm.ram_dedicated_mb,
            affinity: display_affinity(&vm.cpu_affinity),
            numa: vm.numa,
            workload: display_workload(vm.workload.as_deref()),
        })
        .collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{table}");
}

fn print_host_affinity(host: &HostReport) {
    println!("\n{}", format!("Host: {}", host.host).bold());

    println!("\n  CPU Map (0-{}):", host.spec.cores.saturating_sub(1));
    println!("{}", render_cpu_map(&host.cpu_map));
    println!(
        "\n  Legend: {} used   {} free   {} overlap",
        "█".green(),
        "░".white(),
        "█".red().bold()
    );

    if host.free_ranges.is_empty() {
        println!("\n  {}", "No free CPUs available!".yellow());
    } else {
        let ranges: Vec<String> = host.free_ranges.iter().map(|r| r.to_string()).collect();
        println!(
            "\n  {} {}",
            "Free CPU ranges:".green(),
            ranges.join(", ")
        );
        println!("  {} {}", "Free CPU count:".green(), host.free_count);
    }

    if host.overlaps.is_empty() {
        println!("\n  {}", "No CPU affinity overlaps detected.".green());
    } else {
        println!(
            "\n  {}",
            "OVERLAPPING CPU AFFINITY DETECTED!".red().bold()
        );
        for (cpu, vms) in &host.overlaps {
            println!("    CPU {}: {}", cpu, vms.join(", "));
        }
    }

    if !host.unpinned_vms.is_empty() {
        println!("\n  {}", "VMs without CPU affinity:".yellow());
        for vm in &host.unpinned_vms {
            println!("    - {vm}");
        }
    }
}

fn print_network(report: &AnalysisReport) {
    let rows: Vec<IpRow> = report
        .ip_assignments
        .iter()
        .map(|a| IpRow {
            ip: a.ip.clone(),
            vm: a.vm.clone(),
            host: a.host.clone(),
        })
        .collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{table}");

    if report.duplicate_ips.is_empty() {
        println!("\n  {}", "No duplicate IP addresses.".green());
    } else {
        println!(
            "\n  {}",
            "DUPLICATE IP ADDRESSES DETECTED!".red().bold()
        );
        for dup in &report.duplicate_ips {
            println!("    {}: {}", dup.ip, dup.vms.join(", "));
        }
    }

    if !report.bandwidth_limited.is_empty() {
        println!("\n  VMs with bandwidth limits:");
        for bw in &report.bandwidth_limited {
            println!("    {}: {} MB/s", bw.vm, bw.limit_mbps);
        }
    }
}

fn print_storage(report: &AnalysisReport) {
    for ds in &report.datastores {
        println!("\n  {}", format!("Datastore: {}", ds.datastore).bold());
        println!("    Total allocated: {}GB", ds.total_gb);
        println!("    VMs: {}", ds.vms.len());
        for vm in &ds.vms {
            println!("      {}: {}GB", vm.vm, vm.total_gb);
        }
    }

    if !report.additional_disks.is_empty() {
        println!("\n  VMs with additional disks:");
        for entry in &report.additional_disks {
            let disks: Vec<String> = entry
                .disks
                .iter()
                .map(|d| format!("{}:{}GB", d.name, d.size_gb))
                .collect();
            println!("    {}: {}", entry.vm, disks.join(", "));
        }
    }
}

fn print_recommendations(report: &AnalysisReport) {
    if report.findings.is_empty() {
        println!(
            "\n  {}",
            "No issues found. Configuration looks good!".green()
        );
        return;
    }
    println!();
    for finding in &report.findings {
        println!("  {} {}", color_severity(finding.severity), finding.message);
    }
}
