//! Bounded-concurrency audit queue
//!
//! URLs are accepted at any time and started in FIFO order, with at most
//! `capacity` audits in flight. Completed audits are handed back one at a
//! time to the caller, who owns the session and folds them.

use crate::audit::AuditRunner;
use crate::session::PageAudit;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::VecDeque;
use std::time::Instant;
use url::Url;

pub struct DispatchQueue<'a, R: AuditRunner + ?Sized> {
    runner: &'a R,
    capacity: usize,
    pending: VecDeque<Url>,
    running: FuturesUnordered<BoxFuture<'a, PageAudit>>,
    accepted: u64,
}

impl<'a, R: AuditRunner + ?Sized> DispatchQueue<'a, R> {
    /// Creates a queue running at most `capacity` audits at once (minimum 1)
    pub fn new(runner: &'a R, capacity: usize) -> Self {
        Self {
            runner,
            capacity: capacity.max(1),
            pending: VecDeque::new(),
            running: FuturesUnordered::new(),
            accepted: 0,
        }
    }

    /// Enqueues a URL, starting it right away if there is spare capacity
    pub fn submit(&mut self, url: Url) {
        tracing::debug!("Queued audit for {}", url);
        self.accepted += 1;
        self.pending.push_back(url);
        self.fill();
    }

    /// Waits for the next audit to finish and starts the next pending one
    ///
    /// Returns `None` when nothing is running.
    pub async fn next_completed(&mut self) -> Option<PageAudit> {
        let page = self.running.next().await?;
        self.fill();
        Some(page)
    }

    /// Number of audits currently in flight
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Number of accepted URLs not yet started
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total URLs ever submitted
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Returns true when nothing is pending or running
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.running.is_empty()
    }

    fn fill(&mut self) {
        while self.running.len() < self.capacity {
            let Some(url) = self.pending.pop_front() else {
                break;
            };
            self.running.push(audit_page(self.runner, url));
        }
    }
}

fn audit_page<'a, R: AuditRunner + ?Sized>(runner: &'a R, url: Url) -> BoxFuture<'a, PageAudit> {
    async move {
        let started = Instant::now();
        let result = runner.audit(&url).await;
        PageAudit {
            url,
            elapsed: started.elapsed(),
            result,
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditError, AuditOutcome};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingRunner {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl AuditRunner for CountingRunner {
        async fn audit(&self, url: &Url) -> Result<AuditOutcome, AuditError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(AuditOutcome {
                url: url.clone(),
                categories: vec![],
                passed_audits: 1,
            })
        }
    }

    fn url(n: usize) -> Url {
        Url::parse(&format!("https://example.test/{}", n)).unwrap()
    }

    #[tokio::test]
    async fn test_respects_capacity() {
        let runner = CountingRunner::default();
        let mut queue = DispatchQueue::new(&runner, 3);

        for n in 0..10 {
            queue.submit(url(n));
        }
        assert_eq!(queue.running(), 3);
        assert_eq!(queue.pending(), 7);

        let mut completed = 0;
        while let Some(page) = queue.next_completed().await {
            assert!(page.result.is_ok());
            assert!(queue.running() <= 3);
            completed += 1;
        }

        assert_eq!(completed, 10);
        assert_eq!(queue.accepted(), 10);
        assert!(queue.is_idle());
        assert_eq!(runner.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let runner = CountingRunner::default();
        let mut queue = DispatchQueue::new(&runner, 0);
        queue.submit(url(1));
        queue.submit(url(2));
        assert_eq!(queue.running(), 1);

        while queue.next_completed().await.is_some() {}
        assert_eq!(runner.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_yields_none() {
        let runner = CountingRunner::default();
        let mut queue = DispatchQueue::new(&runner, 2);
        assert!(queue.is_idle());
        assert!(queue.next_completed().await.is_none());
    }
}
