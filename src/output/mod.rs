//! Output module for the audit report and console summary
//!
//! This module handles:
//! - Rendering one immutable HTML fragment per audited page
//! - Assembling fragments into the final document and writing it once
//! - Per-page console progress and the end-of-run summary

mod console;
mod html;
mod report;

pub use console::{format_summary, print_page_progress, print_summary, write_page_progress, write_summary};
pub use html::{render_failed_page, render_page, PageFragment};
pub use report::{ReportDocument, REPORT_HEADING, REPORT_TITLE};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
