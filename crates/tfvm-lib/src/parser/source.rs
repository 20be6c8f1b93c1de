//! Source aggregation: role classification and multi-file merge
//!
//! The aggregator consumes `(filename, content)` pairs supplied by a
//! collaborator (the CLI walks the directory); it performs no I/O itself.
//! Each file is classified by its filename or by the role block its content
//! carries; files matching neither role are skipped without error. A
//! structural error aborts only the file it occurs in, and the run
//! continues with the remaining files.

use tracing::{debug, warn};

use crate::error::ParseIssue;
use crate::models::{VirtualMachine, VmRole};
use crate::parser::block::find_named_block;
use crate::parser::vm::parse_role_block;

/// Top-level block name holding master VM declarations
pub const MASTER_BLOCK: &str = "master_vms";
/// Top-level block name holding worker VM declarations
pub const WORKER_BLOCK: &str = "worker_vms";

/// Everything a parse run produced: the merged VM list plus every issue
/// encountered along the way. Issues never abort the run; callers decide
/// how loudly to surface them.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
    /// Merged VM list, in file order then encounter order
    pub vms: Vec<VirtualMachine>,
    /// Per-file and per-VM parse failures
    pub issues: Vec<ParseIssue>,
}

/// Classifies a file's role from its name or content.
///
/// Returns the role and the top-level block name to extract, or `None` when
/// the file declares no VMs of either role.
pub fn classify_role(filename: &str, content: &str) -> Option<(VmRole, &'static str)> {
    let lower = filename.to_lowercase();
    if lower.contains("master") || content.contains(MASTER_BLOCK) {
        Some((VmRole::Master, MASTER_BLOCK))
    } else if lower.contains("worker") || content.contains(WORKER_BLOCK) {
        Some((VmRole::Worker, WORKER_BLOCK))
    } else {
        None
    }
}

/// Parses a set of configuration sources into one merged [`ParsedConfig`].
pub fn parse_sources<'a>(
    sources: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();

    for (filename, content) in sources {
        let Some((role, block_name)) = classify_role(filename, content) else {
            debug!(file = filename, "no role block, skipping");
            continue;
        };

        let role_block = match find_named_block(content, block_name) {
            Ok(Some(block)) => block,
            // Classified by filename but the block is absent: zero VMs,
            // not an error
            Ok(None) => {
                debug!(file = filename, block = block_name, "role block absent");
                continue;
            }
            Err(error) => {
                warn!(file = filename, %error, "structural error, skipping file");
                parsed.issues.push(ParseIssue {
                    file: filename.to_string(),
                    scope: String::new(),
                    error,
                });
                continue;
            }
        };

        match parse_role_block(role_block, role, filename, &mut parsed.issues) {
            Ok(vms) => parsed.vms.extend(vms),
            Err(error) => {
                warn!(file = filename, %error, "structural error, skipping file");
                parsed.issues.push(ParseIssue {
                    file: filename.to_string(),
                    scope: String::new(),
                    error,
                });
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTERS: &str = r#"
resource "proxmox_virtual_environment_vm" "masters" {}

master_vms = {
  "ayumu" = {
    "k8s-master-00" = { cpu = 2 ip = "10.0.0.10" }
  }
}
"#;

    const WORKERS: &str = r#"
worker_vms = {
  "ayumu" = {
    "k8s-worker-00" = { cpu = 4 ip = "10.0.0.20" }
  }
}
"#;

    #[test]
    fn test_classify_by_filename() {
        assert_eq!(
            classify_role("k8s-masters.tf", ""),
            Some((VmRole::Master, MASTER_BLOCK))
        );
        assert_eq!(
            classify_role("Workers.TF", ""),
            Some((VmRole::Worker, WORKER_BLOCK))
        );
    }

    #[test]
    fn test_classify_by_content() {
        assert_eq!(
            classify_role("nodes.tf", MASTERS),
            Some((VmRole::Master, MASTER_BLOCK))
        );
        assert_eq!(classify_role("provider.tf", "provider {}"), None);
    }

    #[test]
    fn test_merge_across_files() {
        let parsed = parse_sources(vec![
            ("masters.tf", MASTERS),
            ("provider.tf", "provider {}"),
            ("workers.tf", WORKERS),
        ]);

        assert!(parsed.issues.is_empty());
        let names: Vec<_> = parsed.vms.iter().map(|vm| vm.name.as_str()).collect();
        assert_eq!(names, vec!["k8s-master-00", "k8s-worker-00"]);
        assert_eq!(parsed.vms[0].role, VmRole::Master);
        assert_eq!(parsed.vms[1].role, VmRole::Worker);
    }

    #[test]
    fn test_filename_match_without_block_contributes_nothing() {
        let parsed = parse_sources(vec![("masters.tf", "variable \"x\" {}")]);
        assert!(parsed.vms.is_empty());
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn test_unterminated_file_is_reported_and_skipped() {
        let broken = "master_vms = {\n  \"h\" = {\n";
        let parsed = parse_sources(vec![("masters.tf", broken), ("workers.tf", WORKERS)]);

        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].file, "masters.tf");
        assert!(parsed.issues[0].scope.is_empty());
        // The broken file contributes zero VMs; the good one still parses
        assert_eq!(parsed.vms.len(), 1);
        assert_eq!(parsed.vms[0].name, "k8s-worker-00");
    }
}
