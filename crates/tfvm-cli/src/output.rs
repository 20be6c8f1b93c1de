//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use tfvm_lib::analyzer::{CpuSlot, CpuState, Severity, UtilizationLevel};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a section header
pub fn print_header(title: &str) {
    println!("\n{}", title.blue().bold());
    println!("{}", "-".repeat(80));
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print a success message
#[allow(dead_code)]
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Color a percentage by its utilization bucket
pub fn color_pct(pct: f64, level: UtilizationLevel) -> String {
    let formatted = format!("{pct:.1}%");
    match level {
        UtilizationLevel::Nominal => formatted.green().to_string(),
        UtilizationLevel::Warning => formatted.yellow().to_string(),
        UtilizationLevel::Critical => formatted.red().to_string(),
    }
}

/// Color a severity tag like `[WARNING]`
pub fn color_severity(severity: Severity) -> String {
    let tag = format!("[{severity}]");
    match severity {
        Severity::Info => tag.blue().to_string(),
        Severity::Warning => tag.yellow().to_string(),
        Severity::Critical => tag.red().to_string(),
    }
}

/// Format memory in MB as a GB figure for host headings
pub fn format_memory_gb(memory_mb: u64) -> String {
    format!("{:.0}GB", memory_mb as f64 / 1024.0)
}

/// Render the per-CPU block map, eight indices per group
pub fn render_cpu_map(cpu_map: &[CpuSlot]) -> String {
    let mut line = String::from("  ");
    for slot in cpu_map {
        let cell = match slot.state {
            CpuState::Overlap => "█".red().bold().to_string(),
            CpuState::Used => "█".green().to_string(),
            CpuState::Free => "░".white().to_string(),
        };
        line.push_str(&cell);
        if (slot.index + 1) % 8 == 0 {
            line.push(' ');
        }
    }
    line.push_str("\n  ");
    for slot in cpu_map {
        line.push_str(&(slot.index % 10).to_string());
        if (slot.index + 1) % 8 == 0 {
            line.push(' ');
        }
    }
    line
}

/// Affinity spec for display: `N/A` when unpinned
pub fn display_affinity(affinity: &str) -> String {
    if affinity.is_empty() {
        "N/A".to_string()
    } else {
        affinity.to_string()
    }
}

/// Workload label for display: `-` when absent
pub fn display_workload(workload: Option<&str>) -> String {
    match workload {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_affinity() {
        assert_eq!(display_affinity(""), "N/A");
        assert_eq!(display_affinity("0-3"), "0-3");
    }

    #[test]
    fn test_display_workload() {
        assert_eq!(display_workload(None), "-");
        assert_eq!(display_workload(Some("")), "-");
        assert_eq!(display_workload(Some("etcd")), "etcd");
    }

    #[test]
    fn test_format_memory_gb() {
        assert_eq!(format_memory_gb(61440), "60GB");
        assert_eq!(format_memory_gb(32768), "32GB");
    }
}
