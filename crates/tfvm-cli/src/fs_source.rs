//! Directory traversal collaborator
//!
//! Yields `(filename, content)` pairs for every `.tf` file directly inside
//! a directory. The core library never touches the filesystem; this is the
//! boundary where I/O happens.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Reads every `*.tf` file in `dir`, sorted by filename so a run's file
/// order is stable across platforms.
pub fn read_tf_files(dir: &Path) -> Result<Vec<(String, String)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("tf") {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        debug!(file = %name, bytes = content.len(), "read source file");
        files.push((name, content));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_only_tf_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("workers.tf"), "worker_vms = {}").unwrap();
        fs::write(dir.path().join("masters.tf"), "master_vms = {}").unwrap();
        fs::write(dir.path().join("README.md"), "not terraform").unwrap();

        let files = read_tf_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["masters.tf", "workers.tf"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(read_tf_files(Path::new("/nonexistent/tfvm")).is_err());
    }
}
