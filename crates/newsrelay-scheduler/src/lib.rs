//! The stateful posting loop: select, compose, publish, record.

pub mod cycle;
pub mod error;
pub mod history;
pub mod runner;
pub mod scheduler;
pub mod stats;
pub mod store;

pub use cycle::{CycleOutcome, CycleStage, CycleState, SkipReason};
pub use error::{PersistenceError, RunnerError};
pub use history::PostedHistory;
pub use runner::{build_job_scheduler, run_until_shutdown};
pub use scheduler::{PreviewItem, PublishScheduler, SchedulerDeps, SchedulerSnapshot};
pub use stats::{PersistedState, RunStats};
pub use store::{JsonFileStore, MemoryStore, StatsStore};
