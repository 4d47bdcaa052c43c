//! Multi-source fetch with bounded concurrency and partial-failure tolerance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use newsrelay_core::{Article, ErrorConfig, FetchConfig, SourceConfig};

use crate::dedup::dedupe;
use crate::error::{FetchError, SourceError};
use crate::retry::RetryPolicy;
use crate::source::{FeedSource, RawEntry};

/// Result of one fetch run.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Deduplicated articles, newest first.
    pub articles: Vec<Article>,
    /// Names of sources that failed after retries, in configuration order.
    pub failed_sources: Vec<String>,
}

pub struct FetchOrchestrator {
    source: Arc<dyn FeedSource>,
    policy: RetryPolicy,
    continue_on_error: bool,
    max_entries_per_source: usize,
    concurrency: usize,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(source: Arc<dyn FeedSource>, errors: &ErrorConfig, fetch: &FetchConfig) -> Self {
        Self {
            source,
            policy: RetryPolicy::from_config(errors),
            continue_on_error: errors.continue_on_source_error,
            max_entries_per_source: fetch.max_entries_per_source,
            concurrency: fetch.concurrency.max(1),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch every enabled source and return recent, deduplicated articles.
    ///
    /// Only the first `max_entries_per_source` entries of each feed are
    /// considered. Entries older than `now - max_age` are dropped; entries
    /// with neither a published nor an updated time are treated as published
    /// at `now`. Results are merged in source order, stable-sorted newest
    /// first, then passed through [`dedupe`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::SourceFailed`] for the first failing source (in
    /// configuration order) when `continue_on_source_error` is off.
    pub async fn fetch_all(
        &self,
        sources: &[SourceConfig],
        max_age: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Result<FetchReport, FetchError> {
        let enabled: Vec<SourceConfig> = sources.iter().filter(|s| s.enabled).cloned().collect();
        let enabled_count = enabled.len();
        let cutoff = now
            .checked_sub_signed(max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        // Per-source futures own their inputs; cron jobs need the whole fetch to be `Send`.
        let results: Vec<(SourceConfig, Result<Vec<RawEntry>, SourceError>)> =
            stream::iter(enabled)
                .map(|src| {
                    let feed = Arc::clone(&self.source);
                    let policy = self.policy;
                    async move {
                        let result = policy.run(&src.name, || feed.fetch(&src)).await;
                        (src, result)
                    }
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut report = FetchReport::default();
        let mut merged = Vec::new();

        for (src, result) in results {
            match result {
                Ok(entries) => {
                    let before = merged.len();
                    merged.extend(
                        entries
                            .into_iter()
                            .take(self.max_entries_per_source)
                            .filter_map(|entry| to_article(entry, &src.name, now))
                            .filter(|a| a.published_at() >= cutoff),
                    );
                    tracing::debug!(
                        source = %src.name,
                        recent = merged.len() - before,
                        "source fetched"
                    );
                }
                Err(e) => {
                    if !self.continue_on_error {
                        return Err(FetchError::SourceFailed {
                            source_name: src.name.clone(),
                            source: e,
                        });
                    }
                    tracing::warn!(
                        source = %src.name,
                        error = %e,
                        "feed source failed, skipping"
                    );
                    report.failed_sources.push(src.name.clone());
                }
            }
        }

        merged.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        let merged_count = merged.len();
        report.articles = dedupe(merged);

        tracing::info!(
            sources = enabled_count,
            failed = report.failed_sources.len(),
            merged = merged_count,
            kept = report.articles.len(),
            "fetch run complete"
        );
        Ok(report)
    }
}

/// Entries without a title or link cannot be posted and are skipped.
fn to_article(entry: RawEntry, source: &str, now: DateTime<Utc>) -> Option<Article> {
    let title = entry.title?;
    let link = entry.link?;
    let published_at = entry.published.or(entry.updated).unwrap_or(now);
    let summary = entry.summary.unwrap_or_else(|| title.clone());
    Some(Article::new(
        title,
        summary,
        link,
        published_at,
        source,
        entry.image_url,
    ))
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
