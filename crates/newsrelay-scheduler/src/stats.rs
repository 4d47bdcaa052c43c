use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counters for posting cycles that got as far as an attempt.
///
/// Every attempt ends as exactly one success or one failure, so
/// `total_attempts == successes + failures` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    total_attempts: u64,
    successes: u64,
    failures: u64,
    last_post_time: Option<DateTime<Utc>>,
    start_time: DateTime<Utc>,
}

impl RunStats {
    #[must_use]
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            total_attempts: 0,
            successes: 0,
            failures: 0,
            last_post_time: None,
            start_time,
        }
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.total_attempts += 1;
        self.successes += 1;
        self.last_post_time = Some(at);
    }

    pub fn record_failure(&mut self) {
        self.total_attempts += 1;
        self.failures += 1;
    }

    /// Recompute `total_attempts` from its parts, for records written by
    /// other tools or older versions. Returns `true` if anything changed.
    pub fn reconcile(&mut self) -> bool {
        let expected = self.successes + self.failures;
        if self.total_attempts == expected {
            return false;
        }
        self.total_attempts = expected;
        true
    }

    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    #[must_use]
    pub fn successes(&self) -> u64 {
        self.successes
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    #[must_use]
    pub fn last_post_time(&self) -> Option<DateTime<Utc>> {
        self.last_post_time
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Successes as a percentage of attempts; `0.0` before the first attempt.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.successes as f64 / self.total_attempts as f64 * 100.0;
        rate
    }

    #[must_use]
    pub fn uptime(&self, now: DateTime<Utc>) -> Duration {
        now - self.start_time
    }
}

/// What is written to the stats store: counters plus the posted URLs,
/// oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(flatten)]
    pub stats: RunStats,
    #[serde(default)]
    pub posted_history: Vec<String>,
}
