//! The publish scheduler: one cycle selects an article, composes a post,
//! publishes it, and records the result.
//!
//! All mutable state sits behind one async mutex that is held for the whole
//! cycle, so cycles never overlap. A trigger that fires while a cycle is
//! still running waits for it to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use newsrelay_compose::{select_image_keyword, ComposeError, ComposedPost, Composer};
use newsrelay_core::{Article, BotConfig, ImageSearch, Publisher, SourceConfig};
use newsrelay_feeds::{FetchError, FetchOrchestrator};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio::sync::Mutex;

use crate::cycle::{CycleOutcome, CycleStage, CycleState, SkipReason};
use crate::history::PostedHistory;
use crate::stats::{PersistedState, RunStats};
use crate::store::StatsStore;

/// Spacing between posts made by one [`PublishScheduler::post_now`] call.
const POST_NOW_SPACING: Duration = Duration::from_secs(10);

/// Collaborators the scheduler drives.
pub struct SchedulerDeps {
    pub fetcher: FetchOrchestrator,
    pub composer: Composer,
    pub publisher: Arc<dyn Publisher>,
    /// `None` disables image attachment regardless of configuration.
    pub images: Option<Arc<dyn ImageSearch>>,
    pub store: Arc<dyn StatsStore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    pub stats: RunStats,
    pub history_len: usize,
}

/// An article and the post that would be published for it.
#[derive(Debug)]
pub struct PreviewItem {
    pub article: Article,
    pub post: Result<ComposedPost, ComposeError>,
}

struct CyclePolicy {
    min_interval: chrono::Duration,
    initial_lookback: chrono::Duration,
    extended_lookback: chrono::Duration,
    attach_images: bool,
    post_without_image_on_error: bool,
    image_keywords: Vec<String>,
    history_cap: usize,
    history_retain: usize,
    post_now_spacing: Duration,
}

struct SchedulerState {
    history: PostedHistory,
    stats: RunStats,
    rng: StdRng,
}

pub struct PublishScheduler {
    sources: Vec<SourceConfig>,
    fetcher: FetchOrchestrator,
    composer: Composer,
    publisher: Arc<dyn Publisher>,
    images: Option<Arc<dyn ImageSearch>>,
    store: Arc<dyn StatsStore>,
    policy: CyclePolicy,
    state: Mutex<SchedulerState>,
    shutting_down: AtomicBool,
}

impl PublishScheduler {
    /// Create a scheduler with empty history and fresh stats starting at `now`.
    /// Call [`restore`](Self::restore) to pick up persisted state.
    #[must_use]
    pub fn new(config: &BotConfig, deps: SchedulerDeps, rng: StdRng, now: DateTime<Utc>) -> Self {
        let policy = CyclePolicy {
            min_interval: config.schedule.min_interval(),
            initial_lookback: config.schedule.initial_lookback(),
            extended_lookback: config.schedule.extended_lookback(),
            attach_images: config.content.attach_images,
            post_without_image_on_error: config.errors.post_without_image_on_error,
            image_keywords: config.image_keywords.clone(),
            history_cap: config.history.cap,
            history_retain: config.history.retain,
            post_now_spacing: POST_NOW_SPACING,
        };
        let state = SchedulerState {
            history: PostedHistory::new(policy.history_cap, policy.history_retain),
            stats: RunStats::new(now),
            rng,
        };
        Self {
            sources: config.sources.clone(),
            fetcher: deps.fetcher,
            composer: deps.composer,
            publisher: deps.publisher,
            images: deps.images,
            store: deps.store,
            policy,
            state: Mutex::new(state),
            shutting_down: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_post_now_spacing(mut self, spacing: Duration) -> Self {
        self.policy.post_now_spacing = spacing;
        self
    }

    /// Load persisted stats and history. A missing or unreadable record
    /// leaves the fresh state in place.
    pub async fn restore(&self) {
        match self.store.load().await {
            Ok(Some(mut saved)) => {
                if saved.stats.reconcile() {
                    tracing::warn!("persisted attempt total was inconsistent, recomputed");
                }
                let mut state = self.state.lock().await;
                state.history = PostedHistory::from_urls(
                    saved.posted_history,
                    self.policy.history_cap,
                    self.policy.history_retain,
                );
                state.stats = saved.stats;
                tracing::info!(
                    total_attempts = state.stats.total_attempts(),
                    history = state.history.len(),
                    "restored persisted stats"
                );
            }
            Ok(None) => tracing::info!("no persisted stats, starting fresh"),
            Err(e) => tracing::warn!(error = %e, "failed to load persisted stats, starting fresh"),
        }
    }

    /// Run one scheduled cycle at the current time.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one scheduled cycle as if the clock read `now`.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> CycleOutcome {
        self.cycle(now, true).await
    }

    /// Post up to `count` articles immediately, ignoring the minimum spacing
    /// guard. Consecutive posts are separated by a fixed pause.
    pub async fn post_now(&self, count: u32) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::new();
        for i in 0..count {
            if i > 0 {
                tokio::time::sleep(self.policy.post_now_spacing).await;
            }
            let outcome = self.cycle(Utc::now(), false).await;
            let stop = matches!(
                outcome,
                CycleOutcome::NoArticles | CycleOutcome::Skipped(SkipReason::ShuttingDown)
            );
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    /// Compose posts for up to `count` unposted recent articles without
    /// publishing or recording anything.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when fetching aborts.
    pub async fn preview(
        &self,
        count: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<PreviewItem>, FetchError> {
        let report = self
            .fetcher
            .fetch_all(&self.sources, self.policy.extended_lookback, now)
            .await?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        Ok(report
            .articles
            .into_iter()
            .filter(|a| !state.history.contains(a.url()))
            .take(count)
            .map(|article| {
                let post = self.composer.compose(&article, &mut state.rng);
                PreviewItem { article, post }
            })
            .collect())
    }

    /// Reject any cycle that has not started yet.
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Persist the current state, waiting for an in-flight cycle to finish.
    pub async fn flush(&self) {
        let state = self.state.lock().await;
        self.persist(&state).await;
        tracing::info!(
            total_attempts = state.stats.total_attempts(),
            "flushed stats"
        );
    }

    pub async fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.state.lock().await;
        SchedulerSnapshot {
            stats: state.stats.clone(),
            history_len: state.history.len(),
        }
    }

    async fn cycle(&self, now: DateTime<Utc>, enforce_spacing: bool) -> CycleOutcome {
        if self.shutting_down.load(Ordering::SeqCst) {
            return CycleOutcome::Skipped(SkipReason::ShuttingDown);
        }

        let mut guard = self.state.lock().await;
        // Shutdown may have begun while waiting for the previous cycle.
        if self.shutting_down.load(Ordering::SeqCst) {
            return CycleOutcome::Skipped(SkipReason::ShuttingDown);
        }
        let state = &mut *guard;

        if enforce_spacing {
            if let Some(last) = state.stats.last_post_time() {
                let elapsed = now - last;
                if elapsed < self.policy.min_interval {
                    let remaining = self.policy.min_interval - elapsed;
                    tracing::info!(
                        remaining_minutes = remaining.num_minutes(),
                        "last post too recent, skipping cycle"
                    );
                    return CycleOutcome::Skipped(SkipReason::MinInterval { remaining });
                }
            }
        }

        let outcome = self.attempt(state, now).await;
        match &outcome {
            CycleOutcome::Posted { url, post_id } => {
                tracing::info!(url = %url, post_id = %post_id, "posted article");
            }
            CycleOutcome::NoArticles => tracing::info!("no articles available, nothing posted"),
            CycleOutcome::Failed { .. } | CycleOutcome::Skipped(_) => {}
        }
        enter(CycleState::Idle);

        self.persist(state).await;
        outcome
    }

    async fn attempt(&self, state: &mut SchedulerState, now: DateTime<Utc>) -> CycleOutcome {
        enter(CycleState::Selecting);
        let article = match self.select(state, now).await {
            Ok(Some(article)) => article,
            Ok(None) => return CycleOutcome::NoArticles,
            Err(e) => return fail(state, CycleStage::Selecting, e.to_string()),
        };

        enter(CycleState::Composing);
        let post = match self.composer.compose(&article, &mut state.rng) {
            Ok(post) => post,
            Err(e) => return fail(state, CycleStage::Composing, e.to_string()),
        };

        enter(CycleState::Publishing);
        let image = match self.image_for(&article, state).await {
            Ok(image) => image,
            Err(reason) => return fail(state, CycleStage::Publishing, reason),
        };
        let post_id = match self.publisher.post(post.body(), image.as_deref()).await {
            Ok(id) => id,
            Err(e) => return fail(state, CycleStage::Publishing, e.to_string()),
        };

        enter(CycleState::Recording);
        state.history.insert(article.url().to_string());
        state.stats.record_success(now);
        CycleOutcome::Posted {
            url: article.url().to_string(),
            post_id,
        }
    }

    /// Pick a random unposted article, widening the lookback once if the
    /// first window is empty. When every candidate was already posted the
    /// history is cleared and the full pool is used.
    async fn select(
        &self,
        state: &mut SchedulerState,
        now: DateTime<Utc>,
    ) -> Result<Option<Article>, FetchError> {
        let mut articles = self
            .fetcher
            .fetch_all(&self.sources, self.policy.initial_lookback, now)
            .await?
            .articles;

        if articles.is_empty() {
            tracing::info!(
                hours = self.policy.extended_lookback.num_hours(),
                "no recent articles, widening lookback"
            );
            articles = self
                .fetcher
                .fetch_all(&self.sources, self.policy.extended_lookback, now)
                .await?
                .articles;
        }
        if articles.is_empty() {
            return Ok(None);
        }

        let mut candidates: Vec<&Article> = articles
            .iter()
            .filter(|a| !state.history.contains(a.url()))
            .collect();
        if candidates.is_empty() {
            tracing::info!(
                pool = articles.len(),
                "every candidate already posted, clearing history"
            );
            state.history.clear();
            candidates = articles.iter().collect();
        }

        tracing::debug!(candidates = candidates.len(), "selecting article");
        Ok(candidates.choose(&mut state.rng).map(|a| (*a).clone()))
    }

    /// Image bytes to attach, `Ok(None)` for a text-only post.
    async fn image_for(
        &self,
        article: &Article,
        state: &mut SchedulerState,
    ) -> Result<Option<Vec<u8>>, String> {
        if !self.policy.attach_images {
            return Ok(None);
        }
        let Some(images) = &self.images else {
            return Ok(None);
        };
        let Some(keyword) =
            select_image_keyword(article.title(), &self.policy.image_keywords, &mut state.rng)
        else {
            return Ok(None);
        };

        match images.find(&keyword).await {
            Ok(Some(bytes)) => {
                tracing::debug!(keyword = %keyword, bytes = bytes.len(), "attached image");
                Ok(Some(bytes))
            }
            Ok(None) => {
                tracing::info!(keyword = %keyword, "no image found, posting text only");
                Ok(None)
            }
            Err(e) if self.policy.post_without_image_on_error => {
                tracing::warn!(keyword = %keyword, error = %e, "image search failed, posting text only");
                Ok(None)
            }
            Err(e) => Err(format!("image search failed: {e}")),
        }
    }

    async fn persist(&self, state: &SchedulerState) {
        let record = PersistedState {
            stats: state.stats.clone(),
            posted_history: state.history.urls(),
        };
        if let Err(e) = self.store.save(&record).await {
            tracing::warn!(error = %e, "failed to persist stats, keeping in-memory state");
        }
    }
}

fn enter(next: CycleState) {
    tracing::trace!(state = %next, "cycle state");
}

fn fail(state: &mut SchedulerState, stage: CycleStage, reason: String) -> CycleOutcome {
    state.stats.record_failure();
    tracing::warn!(stage = %stage, error = %reason, "cycle failed");
    CycleOutcome::Failed { stage, reason }
}
