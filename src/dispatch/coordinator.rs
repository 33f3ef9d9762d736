//! Sweep coordinator - main run orchestration logic
//!
//! This module contains the loop that ties a run together:
//! - Driving discovery and feeding discovered pages to the dispatch queue
//! - Folding each completed audit into the session, one at a time
//! - Stepping the completion gate and finalizing exactly once
//!
//! Everything here runs on one task. Audits overlap only through their
//! subprocesses, so the session needs no locking.

use crate::audit::{AuditCommand, AuditRunner, LighthouseRunner};
use crate::config::Config;
use crate::crawler::{build_http_client, Discoverer, SiteCrawler};
use crate::dispatch::gate::{GateEvent, GateState};
use crate::dispatch::queue::DispatchQueue;
use crate::output::print_summary;
use crate::session::{CrawlSession, RunVerdict};
use crate::LumenError;
use std::path::PathBuf;
use tokio::sync::mpsc;
use url::Url;

/// Everything a sweep needs besides the parsed configuration
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Seed URL to start discovery from
    pub seed: Url,

    /// Configuration file handed to the audit tool
    pub config_path: PathBuf,

    /// Where the HTML report is written
    pub output_path: PathBuf,

    /// How to launch the audit tool
    pub audit_command: AuditCommand,
}

/// Main sweep coordinator structure
pub struct Coordinator<D, R> {
    discoverer: D,
    runner: R,
    session: CrawlSession,
    max_concurrency: usize,
    output_path: PathBuf,
}

impl<D: Discoverer, R: AuditRunner> Coordinator<D, R> {
    /// Creates a coordinator for one run
    ///
    /// # Arguments
    ///
    /// * `discoverer` - Source of pages to audit
    /// * `runner` - Audits a single page
    /// * `seed` - The run's seed URL
    /// * `max_concurrency` - Maximum audits in flight at once
    /// * `output_path` - Where the report is written when the run completes
    pub fn new(
        discoverer: D,
        runner: R,
        seed: Url,
        max_concurrency: usize,
        output_path: PathBuf,
    ) -> Self {
        Self {
            discoverer,
            runner,
            session: CrawlSession::new(seed),
            max_concurrency,
            output_path,
        }
    }

    /// Runs discovery and auditing to completion, then writes the report
    ///
    /// The report is written only after discovery has finished and the
    /// queue has drained; a run interrupted before that writes nothing.
    pub async fn run(self) -> Result<RunVerdict, LumenError> {
        let Self {
            discoverer,
            runner,
            mut session,
            max_concurrency,
            output_path,
        } = self;

        tracing::info!(
            "Starting sweep of {} with up to {} concurrent audits",
            session.seed(),
            max_concurrency
        );

        let (pages_tx, mut pages_rx) = mpsc::unbounded_channel();
        let mut discovery = discoverer.discover(pages_tx);
        let mut discovery_running = true;
        let mut queue = DispatchQueue::new(&runner, max_concurrency);
        let mut gate = GateState::default();

        while !gate.is_done() {
            tokio::select! {
                Some(page) = queue.next_completed(), if queue.running() > 0 => {
                    tracing::debug!("Audit finished for {} in {:?}", page.url, page.elapsed);
                    session.fold(page);
                }

                received = pages_rx.recv(), if gate.accepts_urls() => match received {
                    Some(url) => queue.submit(url),
                    None => {
                        tracing::info!(
                            "Discovery finished: {} pages accepted, {} audits outstanding",
                            queue.accepted(),
                            queue.running() + queue.pending()
                        );
                        gate = gate.on(GateEvent::DiscoveryFinished);
                    }
                },

                result = &mut discovery, if discovery_running => {
                    discovery_running = false;
                    match result {
                        Ok(fetched) => tracing::debug!("Discoverer returned after {} pages", fetched),
                        Err(e) => tracing::error!("Discovery stopped early: {}", e),
                    }
                }
            }

            if queue.is_idle() {
                gate = gate.on(GateEvent::QueueIdle);
            }
        }

        print_summary(&session);

        let (document, verdict) = session.finalize();
        document.write_to(&output_path).await?;

        tracing::info!(
            "Sweep completed: {} pages, {} violations",
            verdict.pages_scanned,
            verdict.total_violations
        );

        Ok(verdict)
    }
}

/// Runs a complete sweep with the HTTP crawler and the Lighthouse runner
///
/// # Example
///
/// ```no_run
/// use lumen_sweep::audit::AuditCommand;
/// use lumen_sweep::config::load_config;
/// use lumen_sweep::dispatch::{run_sweep, SweepOptions};
/// use std::path::{Path, PathBuf};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.json"))?;
/// let options = SweepOptions {
///     seed: Url::parse("https://example.com/")?,
///     config_path: PathBuf::from("/abs/config.json"),
///     output_path: PathBuf::from("result.html"),
///     audit_command: AuditCommand::default(),
/// };
/// let verdict = run_sweep(&config, options).await?;
/// std::process::exit(verdict.exit_code());
/// # }
/// ```
pub async fn run_sweep(config: &Config, options: SweepOptions) -> Result<RunVerdict, LumenError> {
    let crawler_config = &config.settings.crawler;

    let client = build_http_client()?;
    let crawler = SiteCrawler::new(client, options.seed, crawler_config.max_depth)?;
    let runner = LighthouseRunner::new(options.audit_command, options.config_path);
    let seed = crawler.seed().clone();

    Coordinator::new(
        crawler,
        runner,
        seed,
        crawler_config.max_chrome_instances,
        options.output_path,
    )
    .run()
    .await
}
