//! Breadth-first site discovery
//!
//! The crawler walks the seed's site level by level and reports each page it
//! fetched successfully, under the URL it finally landed on after redirects.
//! Pages that fail to fetch are logged and dropped; they never reach the audit
//! queue.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::extract_links;
use crate::url::{normalize_url, SiteScope};
use crate::{LumenError, UrlError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use tokio::sync::mpsc;
use url::Url;

/// Where discovered pages are sent
///
/// Dropping the last sender is the signal that discovery has finished.
pub type PageSink = mpsc::UnboundedSender<Url>;

/// Source of pages to audit
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Discovers pages, sending each successfully fetched one to `pages`
    ///
    /// Returns the number of pages sent. The sink is dropped on return.
    async fn discover(&self, pages: PageSink) -> Result<u64, LumenError>;
}

/// HTTP crawler restricted to the seed's site
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    client: Client,
    seed: Url,
    scope: SiteScope,
    max_depth: u32,
}

impl SiteCrawler {
    /// Creates a crawler for `seed`
    ///
    /// `max_depth` counts the seed as depth 1, so 0 and 1 both mean the seed only.
    pub fn new(client: Client, seed: Url, max_depth: u32) -> Result<Self, LumenError> {
        let seed = normalize_url(seed.as_str())?;
        let scope = SiteScope::from_seed(&seed).ok_or(UrlError::MissingHost)?;

        Ok(Self {
            client,
            seed,
            scope,
            max_depth,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    fn follows_links_at(&self, depth: u32) -> bool {
        depth < self.max_depth
    }
}

#[async_trait]
impl Discoverer for SiteCrawler {
    async fn discover(&self, pages: PageSink) -> Result<u64, LumenError> {
        tracing::info!(
            "Crawling {} (max depth: {})",
            self.scope.host(),
            self.max_depth
        );

        let mut frontier = VecDeque::from([(self.seed.clone(), 1u32)]);
        let mut visited = HashSet::from([self.seed.to_string()]);
        let mut emitted = HashSet::new();
        let mut fetched = 0;

        while let Some((url, depth)) = frontier.pop_front() {
            tracing::debug!("Fetching [depth {}]: {}", depth, url);

            match fetch_url(&self.client, url.as_str()).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                } => {
                    let page = match normalize_url(&final_url) {
                        Ok(landed) if landed != url => {
                            if !self.scope.contains(&landed) {
                                tracing::debug!("Skipping {} (redirected off site to {})", url, landed);
                                continue;
                            }
                            visited.insert(landed.to_string());
                            landed
                        }
                        _ => url.clone(),
                    };

                    // a redirect can land on a page that was already reported
                    if !emitted.insert(page.to_string()) {
                        tracing::debug!("Skipping {} (already discovered as {})", url, page);
                        continue;
                    }

                    tracing::debug!("Fetched {} (HTTP {})", page, status_code);
                    fetched += 1;
                    if pages.send(page.clone()).is_err() {
                        tracing::debug!("Page sink closed, stopping discovery");
                        break;
                    }

                    if !self.follows_links_at(depth) {
                        continue;
                    }

                    for link in extract_links(&body, &page) {
                        let Ok(link) = normalize_url(link.as_str()) else {
                            continue;
                        };
                        if self.scope.contains(&link) && visited.insert(link.to_string()) {
                            frontier.push_back((link, depth + 1));
                        }
                    }
                }
                FetchResult::ContentMismatch { content_type } => {
                    tracing::debug!("Skipping {} (Content-Type: {})", url, content_type);
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Failed to fetch {}: HTTP {}", url, status_code);
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Failed to fetch {}: {}", url, error);
                }
            }
        }

        tracing::info!(
            "Discovery complete: {} pages fetched, {} URLs visited",
            fetched,
            visited.len()
        );
        Ok(fetched)
    }
}
