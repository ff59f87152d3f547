// src/pipeline/ingest.rs

//! The ingestion job.
//!
//! One run is a single linear pass: fetch the feed through the retry
//! wrapper, then for each candidate in feed order skip it if its link is
//! already persisted, otherwise classify and persist it immediately.
//! When at least one entry was created, one summary email is sent.
//!
//! Failure semantics: fetch exhaustion and persistence errors abort the
//! run; classification degrades to the fallback label; notification
//! failure is logged and swallowed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RetryConfig;
use crate::scheduler::SchedulerJob;
use crate::services::{Classifier, FeedSource, Notifier};
use crate::store::EntryStore;
use crate::utils::retry::retry;

/// Subject line of the per-run summary email.
pub const NOTIFICATION_SUBJECT: &str = "RSS Summary Update";

/// Counters describing one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Candidates produced by the feed
    pub fetched: usize,
    /// Candidates skipped because their link was already persisted
    pub skipped: usize,
    /// Entries created this run
    pub created: usize,
    /// Whether the summary email went out
    pub notified: bool,
}

/// Orchestrates one ingestion pass over the configured collaborators.
pub struct IngestionJob {
    feed: Arc<dyn FeedSource>,
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn EntryStore>,
    notifier: Arc<dyn Notifier>,
    retry: RetryConfig,
    interval: Duration,
}

impl IngestionJob {
    /// Create a job over the given collaborators.
    pub fn new(
        feed: Arc<dyn FeedSource>,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn EntryStore>,
        notifier: Arc<dyn Notifier>,
        retry: RetryConfig,
        interval: Duration,
    ) -> Self {
        Self {
            feed,
            classifier,
            store,
            notifier,
            retry,
            interval,
        }
    }

    /// Execute one ingestion run.
    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Ingestion run started");

        let delay = Duration::from_secs(self.retry.delay_secs);
        let candidates = retry(|| self.feed.fetch(), self.retry.attempts, delay).await?;
        tracing::info!("Fetched {} candidate entries", candidates.len());

        let mut outcome = RunOutcome {
            fetched: candidates.len(),
            ..RunOutcome::default()
        };
        let mut new_items: Vec<String> = Vec::new();

        for candidate in &candidates {
            if self.store.exists(&candidate.link).await? {
                tracing::debug!(link = %candidate.link, "Skipping known entry");
                outcome.skipped += 1;
                continue;
            }

            let category = self
                .classifier
                .classify(&candidate.title, &candidate.summary)
                .await;

            // Persist before moving on: a crash mid-run loses at most the
            // in-flight item, not prior progress.
            let entry = self.store.create(candidate, &category).await?;
            tracing::debug!(id = entry.id, category = %entry.category, "Entry persisted");

            outcome.created += 1;
            new_items.push(entry.summary_line());
        }

        if !new_items.is_empty() {
            let body = new_items.join("\n");
            match self.notifier.send(NOTIFICATION_SUBJECT, &body).await {
                Ok(()) => outcome.notified = true,
                Err(e) => tracing::warn!("Notification failed: {e}"),
            }
        }

        tracing::info!(
            fetched = outcome.fetched,
            skipped = outcome.skipped,
            created = outcome.created,
            notified = outcome.notified,
            "Ingestion run complete"
        );

        Ok(outcome)
    }
}

#[async_trait]
impl SchedulerJob for IngestionJob {
    fn name(&self) -> &'static str {
        "ingest"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> Result<()> {
        self.run().await.map(|_| ())
    }
}
