//! Crawler module for page discovery
//!
//! This module contains the Fetcher/Discoverer side of a run:
//! - HTTP fetching and response classification
//! - HTML link extraction
//! - A breadth-first site crawl that reports every fetched page
//!
//! Discovery only finds pages; auditing them is the dispatch module's job.

mod discovery;
mod fetcher;
mod parser;

pub use discovery::{Discoverer, PageSink, SiteCrawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::extract_links;
