//! Crawl session state
//!
//! A `CrawlSession` is the only mutable state of a run. It is owned by the
//! dispatch loop and changed in exactly one place, `fold`, once per completed
//! audit. Finalizing consumes the session, so a report can only be produced
//! once.

use crate::audit::{AuditError, AuditOutcome};
use crate::output::{print_page_progress, render_failed_page, render_page, PageFragment, ReportDocument};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

/// The result of one audit as handed back by the dispatch queue
#[derive(Debug)]
pub struct PageAudit {
    /// The page that was audited
    pub url: Url,

    /// Wall time from spawning the audit to its exit
    pub elapsed: Duration,

    /// Normalized outcome, or the reason the page hard-failed
    pub result: Result<AuditOutcome, AuditError>,
}

/// Timing record for one audited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTiming {
    pub url: String,
    pub elapsed: Duration,
}

/// Process-wide state for one run
#[derive(Debug)]
pub struct CrawlSession {
    seed: Url,
    started_at: DateTime<Local>,
    started: Instant,
    audit_times: Vec<AuditTiming>,
    pages_scanned: u64,
    passed_audits: u64,
    violation_counts: BTreeMap<String, u64>,
    audit_failures: u64,
    fragments: Vec<PageFragment>,
}

impl CrawlSession {
    pub fn new(seed: Url) -> Self {
        Self {
            seed,
            started_at: Local::now(),
            started: Instant::now(),
            audit_times: Vec::new(),
            pages_scanned: 0,
            passed_audits: 0,
            violation_counts: BTreeMap::new(),
            audit_failures: 0,
            fragments: Vec::new(),
        }
    }

    /// Folds one completed audit into the session
    ///
    /// The page's fragment is appended whole and its counts added in the same
    /// call, so no other page can interleave with it.
    pub fn fold(&mut self, page: PageAudit) {
        self.pages_scanned += 1;
        self.audit_times.push(AuditTiming {
            url: page.url.to_string(),
            elapsed: page.elapsed,
        });

        match page.result {
            Ok(outcome) => {
                print_page_progress(&outcome);

                self.passed_audits += outcome.passed_audits;
                for category in outcome.failing_categories() {
                    *self
                        .violation_counts
                        .entry(category.name.clone())
                        .or_insert(0) += category.violation_count();
                }
                self.fragments.push(render_page(&outcome));
            }
            Err(error) => {
                tracing::error!("Audit of {} failed: {}", page.url, error);
                if let Some(output) = error.raw_output() {
                    tracing::error!("Parsing JSON report output failed: {}", output);
                }

                self.audit_failures += 1;
                self.fragments.push(render_failed_page(&page.url, &error));
            }
        }
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Wall-clock time since the session was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn pages_scanned(&self) -> u64 {
        self.pages_scanned
    }

    pub fn passed_audits(&self) -> u64 {
        self.passed_audits
    }

    /// Pages whose audit could not be completed (one violation each)
    pub fn audit_failures(&self) -> u64 {
        self.audit_failures
    }

    /// Violations per category, ordered by category name
    pub fn violation_counts(&self) -> &BTreeMap<String, u64> {
        &self.violation_counts
    }

    pub fn audit_times(&self) -> &[AuditTiming] {
        &self.audit_times
    }

    /// Mean per-page audit duration, zero when nothing was audited
    pub fn average_audit_time(&self) -> Duration {
        if self.audit_times.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.audit_times.iter().map(|t| t.elapsed).sum();
        total / self.audit_times.len() as u32
    }

    /// Every violation of the run: category counts plus failed audits
    pub fn total_violations(&self) -> u64 {
        self.violation_counts.values().sum::<u64>() + self.audit_failures
    }

    /// Closes the session, yielding the report document and the verdict
    pub fn finalize(self) -> (ReportDocument, RunVerdict) {
        let verdict = RunVerdict {
            pages_scanned: self.pages_scanned,
            total_violations: self.total_violations(),
        };
        (ReportDocument::new(self.fragments), verdict)
    }
}

/// How a finished run went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunVerdict {
    pub pages_scanned: u64,
    pub total_violations: u64,
}

impl RunVerdict {
    pub fn is_clean(&self) -> bool {
        self.total_violations == 0
    }

    /// Process exit status: 0 for a clean run, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }
}
