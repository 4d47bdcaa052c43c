use thiserror::Error;

/// Stats could not be read or written. Never fatal: the scheduler keeps its
/// in-memory state and tries again after the next cycle.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("stats file I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stats serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("job scheduler error: {0}")]
    Jobs(#[from] tokio_cron_scheduler::JobSchedulerError),
}
