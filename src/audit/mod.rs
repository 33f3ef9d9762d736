//! Audit module: running the external page-auditing tool and normalizing
//! its report
//!
//! This module contains:
//! - The normalized per-page result types (`AuditOutcome` and friends)
//! - Deserialization of the tool's JSON report and its reduction into
//!   failed checks with violation counts
//! - The `AuditRunner` seam and its subprocess-backed implementation

mod model;
mod report;
mod runner;

pub use model::{AuditOutcome, CategoryResult, CheckDetail, FailedCheck, NodeGroup};
pub use report::{parse_report, strip_boilerplate, MAX_SCORE};
pub use runner::{AuditCommand, AuditRunner, LighthouseRunner, FIXED_FLAGS};

use thiserror::Error;

/// Errors that hard-fail the audit of a single page
///
/// None of these abort a run: the dispatch loop turns each one into a single
/// violation for the page that produced it.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to run audit tool `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("audit report for {url} is not valid JSON: {source}")]
    Parse {
        url: String,
        output: String,
        source: serde_json::Error,
    },
}

impl AuditError {
    /// The captured tool output, when the failure happened after the tool ran
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Parse { output, .. } => Some(output),
            Self::Spawn { .. } => None,
        }
    }
}
