//! Wiring of [`PublishScheduler`] cycles onto a cron job scheduler.

use std::future::Future;
use std::sync::Arc;

use newsrelay_core::Trigger;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::error::RunnerError;
use crate::scheduler::PublishScheduler;

/// Build and start a [`JobScheduler`] that runs one cycle per trigger firing.
///
/// Clock triggers register one daily cron job per time (UTC). An interval
/// trigger registers a single repeating job whose first run is one interval
/// after startup.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_job_scheduler(
    scheduler: Arc<PublishScheduler>,
    trigger: &Trigger,
) -> Result<JobScheduler, JobSchedulerError> {
    let jobs = JobScheduler::new().await?;

    match trigger {
        Trigger::ClockTimes(_) => {
            for expr in trigger.cron_expressions() {
                let scheduler = Arc::clone(&scheduler);
                let job = Job::new_async(expr.as_str(), move |_uuid, _lock| {
                    let scheduler = Arc::clone(&scheduler);
                    Box::pin(async move {
                        tracing::debug!("scheduler: clock trigger fired");
                        scheduler.run_cycle().await;
                    })
                })?;
                jobs.add(job).await?;
                tracing::info!(cron = %expr, "registered posting job");
            }
        }
        Trigger::Interval(every) => {
            let job = Job::new_repeated_async(*every, move |_uuid, _lock| {
                let scheduler = Arc::clone(&scheduler);
                Box::pin(async move {
                    tracing::debug!("scheduler: interval trigger fired");
                    scheduler.run_cycle().await;
                })
            })?;
            jobs.add(job).await?;
            tracing::info!(interval_secs = every.as_secs(), "registered posting job");
        }
    }

    jobs.start().await?;
    Ok(jobs)
}

/// Run scheduled cycles until `shutdown` resolves, then stop accepting new
/// cycles, let an in-flight cycle finish, and persist the final state.
///
/// # Errors
///
/// Returns [`RunnerError::Jobs`] if the job scheduler fails to start or stop.
pub async fn run_until_shutdown<F>(
    scheduler: Arc<PublishScheduler>,
    trigger: &Trigger,
    shutdown: F,
) -> Result<(), RunnerError>
where
    F: Future<Output = ()>,
{
    let mut jobs = build_job_scheduler(Arc::clone(&scheduler), trigger).await?;
    tracing::info!("newsrelay scheduler running");

    shutdown.await;
    tracing::info!("shutdown requested, stopping scheduler");

    scheduler.begin_shutdown();
    jobs.shutdown().await?;
    scheduler.flush().await;
    Ok(())
}
