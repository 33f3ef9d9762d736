//! Lumen-Sweep: a site-wide page auditor
//!
//! This crate crawls a website from a seed URL, runs an external page-auditing
//! tool (Lighthouse) against every page it discovers, and folds the per-page
//! results into a single HTML report and a console summary.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod dispatch;
pub mod output;
pub mod session;
pub mod url;

use thiserror::Error;

/// Main error type for Lumen-Sweep operations
#[derive(Debug, Error)]
pub enum LumenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Lumen-Sweep operations
pub type Result<T> = std::result::Result<T, LumenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{AuditOutcome, AuditRunner, CategoryResult, FailedCheck, LighthouseRunner};
pub use config::Config;
pub use dispatch::{run_sweep, Coordinator, SweepOptions};
pub use session::{CrawlSession, RunVerdict};
