//! Error taxonomy for parsing
//!
//! Two classes of parse failure exist: structural errors (an unterminated
//! block, fatal to the file it occurs in) and field-format errors (a field
//! that is present but malformed, fatal to the single VM record it belongs
//! to). Both are collected as [`ParseIssue`]s so a run can continue with the
//! remaining files and VMs instead of aborting outright.

use thiserror::Error;

/// A parse failure, scoped to one file or one VM record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An opening brace with no matching close before end of input.
    /// Fatal to the current file.
    #[error("unterminated block starting at byte {offset}")]
    UnterminatedBlock { offset: usize },

    /// A field that is present but does not decode as the requested type.
    /// Fatal to the current VM record.
    #[error("field `{key}` is present but not a valid {expected}")]
    MalformedField {
        key: String,
        expected: &'static str,
    },

    /// A CPU affinity token that is not a number or dash range.
    /// Fatal to the current VM record.
    #[error("invalid CPU affinity token `{token}`: {reason}")]
    InvalidAffinity { token: String, reason: String },
}

/// A [`ParseError`] annotated with where it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Source file the error occurred in
    pub file: String,
    /// Host and/or VM context, e.g. "host ayumu, vm k8s-master-00"; empty
    /// when the error is file-level
    pub scope: String,
    pub error: ParseError,
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scope.is_empty() {
            write!(f, "{}: {}", self.file, self.error)
        } else {
            write!(f, "{} ({}): {}", self.file, self.scope, self.error)
        }
    }
}
