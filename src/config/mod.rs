//! Configuration module for Lumen-Sweep
//!
//! This module handles loading, parsing, and validating the JSON configuration
//! file. The same file is later handed untouched to the audit tool, so every
//! key this crate does not understand is preserved rather than rejected.
//!
//! # Example
//!
//! ```no_run
//! use lumen_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.json")).unwrap();
//! println!("Crawler will use max depth: {}", config.settings.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, Settings, DEFAULT_MAX_CHROME_INSTANCES, DEFAULT_MAX_DEPTH};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
