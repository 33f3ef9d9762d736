//! URL handling module for Lumen-Sweep
//!
//! This module provides URL normalization for deduplicating discovered pages
//! and the same-site scope that keeps discovery on the seed's host.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use scope::SiteScope;
