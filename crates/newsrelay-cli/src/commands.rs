//! Subcommand implementations.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use newsrelay_clients::{DryRunPublisher, HttpPublisher, UnsplashImageSearch};
use newsrelay_compose::{seeded_rng, Composer};
use newsrelay_core::{AppConfig, BotConfig, ImageSearch, Publisher};
use newsrelay_feeds::{FeedSource, FetchOrchestrator, RssFeedSource};
use newsrelay_scheduler::{
    run_until_shutdown, CycleOutcome, JsonFileStore, MemoryStore, PublishScheduler, RunStats,
    SchedulerDeps, StatsStore,
};

pub(crate) async fn run<F>(
    app: &AppConfig,
    bot: &BotConfig,
    dry_run: bool,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let trigger = bot.schedule.trigger()?;
    let scheduler = Arc::new(build_scheduler(app, bot, dry_run).await?);
    run_until_shutdown(scheduler, &trigger, shutdown).await?;
    Ok(())
}

pub(crate) async fn post_now(
    app: &AppConfig,
    bot: &BotConfig,
    dry_run: bool,
    count: u32,
) -> anyhow::Result<()> {
    let scheduler = build_scheduler(app, bot, dry_run).await?;
    let outcomes = scheduler.post_now(count).await;

    for outcome in &outcomes {
        println!("{}", describe(outcome));
    }
    let posted = outcomes
        .iter()
        .filter(|o| matches!(o, CycleOutcome::Posted { .. }))
        .count();
    println!("posted {posted} of {count} requested");
    Ok(())
}

pub(crate) async fn stats(app: &AppConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(app.stats_path.clone());
    let Some(mut state) = store.load().await? else {
        println!("no stats recorded yet at {}", store.path().display());
        return Ok(());
    };
    state.stats.reconcile();
    print!("{}", render_stats(&state.stats, state.posted_history.len()));
    Ok(())
}

pub(crate) async fn preview(app: &AppConfig, bot: &BotConfig, count: usize) -> anyhow::Result<()> {
    // Previews never publish, so the dry-run publisher is always enough.
    let scheduler = build_scheduler(app, bot, true).await?;
    let items = scheduler.preview(count, Utc::now()).await?;
    if items.is_empty() {
        println!("no unposted articles in the lookback window");
        return Ok(());
    }

    for (i, item) in items.iter().enumerate() {
        let article = &item.article;
        println!("[{}] {} ({})", i + 1, article.title(), article.source());
        println!("    {}", article.url());
        match &item.post {
            Ok(post) => println!("    {} chars: {post}", post.char_len()),
            Err(e) => println!("    cannot compose: {e}"),
        }
    }
    Ok(())
}

async fn build_scheduler(
    app: &AppConfig,
    bot: &BotConfig,
    dry_run: bool,
) -> anyhow::Result<PublishScheduler> {
    let feed = Arc::new(RssFeedSource::new(app.http_timeout_secs, &app.user_agent)?);
    assemble_scheduler(app, bot, dry_run, feed).await
}

async fn assemble_scheduler(
    app: &AppConfig,
    bot: &BotConfig,
    dry_run: bool,
    feed: Arc<dyn FeedSource>,
) -> anyhow::Result<PublishScheduler> {
    let timeout = app.http_timeout_secs;
    let fetcher = FetchOrchestrator::new(feed, &bot.errors, &bot.fetch);

    let publisher: Arc<dyn Publisher> = match (&app.publish_url, dry_run) {
        (Some(url), false) => Arc::new(HttpPublisher::new(
            url,
            app.publish_token.as_deref(),
            timeout,
            &app.user_agent,
        )?),
        (None, false) => {
            tracing::warn!("NEWSRELAY_PUBLISH_URL not set, posts will only be logged");
            Arc::new(DryRunPublisher::new())
        }
        (_, true) => Arc::new(DryRunPublisher::new()),
    };
    let logs_only = dry_run || app.publish_url.is_none();

    let images: Option<Arc<dyn ImageSearch>> = match &app.unsplash_access_key {
        Some(key) => Some(Arc::new(
            UnsplashImageSearch::new(key, timeout, &app.user_agent)?
                .with_rng(seeded_rng(app.rng_seed)),
        )),
        None => {
            if bot.content.attach_images {
                tracing::info!("UNSPLASH_ACCESS_KEY not set, posting without images");
            }
            None
        }
    };

    let deps = SchedulerDeps {
        fetcher,
        composer: Composer::from_config(bot),
        publisher,
        images,
        store: stats_store(&app.stats_path, logs_only).await,
    };
    let scheduler = PublishScheduler::new(bot, deps, seeded_rng(app.rng_seed), Utc::now());
    scheduler.restore().await;
    Ok(scheduler)
}

/// The stats file for real publishing. Dry runs start from a copy of it held
/// in memory, so posts that were only logged never reach the file.
async fn stats_store(path: &Path, dry_run: bool) -> Arc<dyn StatsStore> {
    let file = JsonFileStore::new(path);
    if !dry_run {
        return Arc::new(file);
    }
    let store = match file.load().await {
        Ok(Some(state)) => MemoryStore::with_state(state),
        Ok(None) => MemoryStore::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stats for dry run, starting fresh");
            MemoryStore::default()
        }
    };
    Arc::new(store)
}

fn describe(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::Posted { url, post_id } => format!("posted {post_id}: {url}"),
        CycleOutcome::NoArticles => "no articles available".to_string(),
        CycleOutcome::Failed { stage, reason } => format!("failed while {stage}: {reason}"),
        CycleOutcome::Skipped(reason) => format!("skipped: {reason:?}"),
    }
}

fn render_stats(stats: &RunStats, history_len: usize) -> String {
    let uptime = stats.uptime(Utc::now());
    let last_post = stats
        .last_post_time()
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    format!(
        "uptime:         {}h {}m\n\
         attempts:       {}\n\
         successes:      {}\n\
         failures:       {}\n\
         success rate:   {:.1}%\n\
         last post:      {last_post}\n\
         posted history: {history_len}\n",
        uptime.num_hours(),
        uptime.num_minutes() % 60,
        stats.total_attempts(),
        stats.successes(),
        stats.failures(),
        stats.success_rate(),
    )
}
