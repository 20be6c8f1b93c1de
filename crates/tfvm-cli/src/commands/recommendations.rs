//! Recommendations listing

use anyhow::Result;
use colored::Colorize;
use tfvm_lib::analyzer::AnalysisReport;

use crate::output::{color_severity, OutputFormat};

/// Print only the findings section of a report
pub fn show_recommendations(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.findings)?);
        }
        OutputFormat::Table => {
            if report.findings.is_empty() {
                println!(
                    "{}",
                    "No issues found. Configuration looks good!".green()
                );
                return Ok(());
            }
            for finding in &report.findings {
                println!("{} {}", color_severity(finding.severity), finding.message);
            }
            println!("\nTotal: {} findings", report.findings.len());
        }
    }
    Ok(())
}
