//! Terraform VM Analyzer CLI
//!
//! A command-line tool that parses Terraform VM declarations and reports
//! capacity utilization, CPU affinity conflicts, network and storage
//! allocation, and policy recommendations.

mod commands;
mod config;
mod fs_source;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{recommendations, report, vms};
use config::NodesConfig;
use output::{print_error, OutputFormat};
use tfvm_lib::{analyze, parse_sources, ParsedConfig};

/// Terraform VM Analyzer CLI
#[derive(Parser)]
#[command(name = "tfvm")]
#[command(author, version, about = "Analyze Terraform VM configurations", long_about = None)]
pub struct Cli {
    /// Directory containing .tf files (can also be set via TFVM_DIR)
    #[arg(long, short, env = "TFVM_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Path to the node spec TOML file
    #[arg(long, env = "TFVM_NODES_FILE")]
    pub nodes: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the full analysis report
    Report,

    /// List every parsed VM
    Vms,

    /// Print only the policy recommendations
    Recommendations,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let nodes_config = NodesConfig::load(cli.nodes.as_deref())?;
    let parsed = load_vms(&cli.dir)?;

    match cli.command {
        Commands::Report => {
            let report = analyze(&parsed.vms, &nodes_config.nodes)?;
            report::show_report(&report, cli.format)?;
        }
        Commands::Vms => {
            vms::list_vms(&parsed.vms, cli.format)?;
        }
        Commands::Recommendations => {
            let report = analyze(&parsed.vms, &nodes_config.nodes)?;
            recommendations::show_recommendations(&report, cli.format)?;
        }
    }

    Ok(())
}

/// Parse every .tf file in the directory. Per-file and per-VM issues are
/// printed but do not abort the run; finding zero VMs overall does.
fn load_vms(dir: &Path) -> Result<ParsedConfig> {
    let files = fs_source::read_tf_files(dir)?;
    let parsed = parse_sources(
        files
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str())),
    );

    for issue in &parsed.issues {
        print_error(&issue.to_string());
    }
    if parsed.vms.is_empty() {
        bail!("no VMs found in Terraform files under {}", dir.display());
    }
    info!(vms = parsed.vms.len(), issues = parsed.issues.len(), "parse complete");

    Ok(parsed)
}
