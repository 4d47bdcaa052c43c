//! Per-source retry policy.
//!
//! [`RetryPolicy::run`] wraps a fallible fetch and retries it on transient
//! [`SourceError`]s. Permanent errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use newsrelay_core::{Backoff, ErrorConfig};

use crate::error::SourceError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always at least 1.
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            backoff,
        }
    }

    #[must_use]
    pub fn from_config(errors: &ErrorConfig) -> Self {
        Self::new(
            errors.max_attempts,
            Duration::from_secs(errors.retry_delay_secs),
            errors.backoff,
        )
    }

    /// Sleep before retry number `retry` (1-based).
    ///
    /// | Backoff       | retry 1 | retry 2 | retry 3 |
    /// |---------------|---------|---------|---------|
    /// | `fixed`       | d       | d       | d       |
    /// | `exponential` | d       | 2d      | 4d      |
    ///
    /// Capped at five minutes.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let delay = match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 1u32 << retry.saturating_sub(1).min(16);
                self.delay.saturating_mul(factor)
            }
        };
        delay.min(MAX_DELAY)
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out.
    ///
    /// # Errors
    ///
    /// Returns the last [`SourceError`] observed.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_transient() || attempt >= self.max_attempts {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        source = label,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient feed error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn unavailable() -> SourceError {
        SourceError::UnexpectedStatus {
            status: 503,
            url: "https://feeds.example.com".to_owned(),
        }
    }

    fn not_found() -> SourceError {
        SourceError::UnexpectedStatus {
            status: 404,
            url: "https://feeds.example.com".to_owned(),
        }
    }

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO, Backoff::Fixed)
    }

    #[test]
    fn fixed_backoff_keeps_delay_constant() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5), Backoff::Fixed);
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(3), Duration::from_secs(5));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5), Backoff::Exponential);
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(2), Duration::from_secs(10));
        assert_eq!(policy.delay_for(3), Duration::from_secs(20));
        assert_eq!(policy.delay_for(12), MAX_DELAY);
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(instant(0).max_attempts, 1);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(3)
            .run("test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, SourceError>(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(3)
            .run("test", || {
                let c = Arc::clone(&c);
                async move {
                    let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt < 3 {
                        Err(unavailable())
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(3)
            .run("test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(unavailable())
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3, "3 total attempts");
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(3)
            .run("test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(not_found())
                }
            })
            .await;
        assert!(matches!(
            result,
            Err(SourceError::UnexpectedStatus { status: 404, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
