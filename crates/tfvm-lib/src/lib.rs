//! Core library for the Terraform VM configuration analyzer
//!
//! This crate provides the functionality for:
//! - Structural block parsing of Terraform-style VM declarations
//! - CPU affinity parsing and free-range computation
//! - Role classification and multi-file aggregation
//! - Static utilization, network, storage, and policy analysis
//!
//! The library performs no I/O: callers supply `(filename, content)` pairs
//! and the operator's host-spec table, and receive the parsed VM list and
//! an [`analyzer::AnalysisReport`] back.

pub mod analyzer;
pub mod error;
pub mod models;
pub mod parser;

pub use analyzer::{analyze, AnalysisReport, Finding, Severity, UtilizationLevel};
pub use error::{ParseError, ParseIssue};
pub use models::*;
pub use parser::{parse_sources, ParsedConfig};
