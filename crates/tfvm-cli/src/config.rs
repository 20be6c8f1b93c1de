//! Node spec configuration
//!
//! The operator describes each physical host in a TOML file:
//!
//! ```toml
//! [nodes.ayumu]
//! sockets = 1
//! cores = 16
//! memory_mb = 61440
//! ```
//!
//! Values can also come from `TFVM_`-prefixed environment variables. Hosts
//! absent from the table fall back to the library's defaults and the report
//! carries an informational note for each.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tfvm_lib::NodeSpec;

/// Operator-supplied host hardware table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesConfig {
    #[serde(default)]
    pub nodes: HashMap<String, NodeSpec>,
}

impl NodesConfig {
    /// Load configuration from an optional TOML file layered with the
    /// environment. A missing file with no environment overrides yields an
    /// empty table, which is valid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }

        let loaded = builder
            .add_source(config::Environment::with_prefix("TFVM").separator("__"))
            .build()
            .context("failed to load node configuration")?;

        loaded
            .try_deserialize()
            .context("node configuration is malformed")
    }
}
