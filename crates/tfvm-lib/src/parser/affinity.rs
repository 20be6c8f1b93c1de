//! CPU affinity list parsing and range compression
//!
//! An affinity spec is a comma-separated list where each token is a single
//! CPU index or an inclusive `start-end` range, e.g. `"0-3,6,8-9"`. The
//! parsed form is the union set of all referenced indices. A reversed range
//! (`start > end`) yields no indices and is not an error; a token that is
//! not numeric at all is.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Set of CPU indices a VM is pinned to; empty when unset
pub type AffinitySet = BTreeSet<u32>;

/// Parses an affinity spec into the union set of referenced CPU indices.
///
/// An empty or whitespace-only spec is valid and means "no pinning
/// configured". Duplicate indices collapse: `"3,3,3"` parses to `{3}`.
pub fn parse(spec: &str) -> Result<AffinitySet, ParseError> {
    let mut cpus = AffinitySet::new();
    if spec.trim().is_empty() {
        return Ok(cpus);
    }

    for token in spec.split(',') {
        let token = token.trim();
        if let Some((start, end)) = token.split_once('-') {
            let start = parse_index(start.trim(), token)?;
            let end = parse_index(end.trim(), token)?;
            // Reversed ranges yield nothing, matching the source language
            cpus.extend(start..=end);
        } else {
            cpus.insert(parse_index(token, token)?);
        }
    }

    Ok(cpus)
}

fn parse_index(digits: &str, token: &str) -> Result<u32, ParseError> {
    digits.parse().map_err(|_| ParseError::InvalidAffinity {
        token: token.to_string(),
        reason: format!("`{digits}` is not a non-negative integer"),
    })
}

/// An inclusive range of CPU indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRange {
    pub start: u32,
    pub end: u32,
}

impl std::fmt::Display for CpuRange {
    /// Renders as `"2-4"`, or just `"7"` for a single index
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Compresses a set of CPU indices into minimal contiguous inclusive
/// ranges, in ascending order: `{2,3,4,7}` becomes `[2-4, 7]`.
pub fn compress_ranges(cpus: &AffinitySet) -> Vec<CpuRange> {
    let mut ranges = Vec::new();
    let mut iter = cpus.iter().copied();

    let Some(first) = iter.next() else {
        return ranges;
    };
    let mut start = first;
    let mut end = first;

    for cpu in iter {
        if cpu == end + 1 {
            end = cpu;
        } else {
            ranges.push(CpuRange { start, end });
            start = cpu;
            end = cpu;
        }
    }
    ranges.push(CpuRange { start, end });

    ranges
}
