//! Structural parsing of Terraform-style VM declarations
//!
//! This module recovers VM records from nested brace-delimited blocks
//! without a full grammar: block extraction by quote-aware brace counting,
//! typed scalar field extraction, the host → VM → disk walk, and the
//! per-file role classification that merges a directory's worth of sources
//! into one flat VM list.

pub mod affinity;
pub mod block;
pub mod fields;
pub mod source;
pub mod vm;

#[cfg(test)]
mod tests;

pub use affinity::{compress_ranges, AffinitySet, CpuRange};
pub use block::{block_span, find_named_block, named_children};
pub use source::{classify_role, parse_sources, ParsedConfig};
