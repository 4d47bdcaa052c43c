//! Resolution of the schedule section into a concrete trigger.

use std::time::Duration;

use chrono::{NaiveTime, Timelike};

use crate::settings::{parse_post_time, ScheduleConfig};
use crate::ConfigError;

/// What drives scheduling cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Fire once per day at each of these UTC wall-clock times.
    ClockTimes(Vec<NaiveTime>),
    /// Fire every `Duration`, starting one interval after startup.
    Interval(Duration),
}

impl Trigger {
    /// Six-field cron expressions (`sec min hour dom mon dow`) for clock triggers.
    #[must_use]
    pub fn cron_expressions(&self) -> Vec<String> {
        match self {
            Trigger::ClockTimes(times) => times
                .iter()
                .map(|t| format!("0 {} {} * * *", t.minute(), t.hour()))
                .collect(),
            Trigger::Interval(_) => Vec::new(),
        }
    }
}

impl ScheduleConfig {
    /// Resolve the configured trigger.
    ///
    /// Precedence: `interval_minutes`, then explicit `post_times`, then
    /// `posts_per_day` spread over the day.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero or overflowing interval, a malformed
    /// `HH:MM` time, or a `posts_per_day` outside `1..=24`.
    pub fn trigger(&self) -> Result<Trigger, ConfigError> {
        if let Some(minutes) = self.interval_minutes {
            if minutes == 0 {
                return Err(ConfigError::Validation(
                    "schedule.interval_minutes must be positive".to_string(),
                ));
            }
            let secs = minutes.checked_mul(60).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "schedule.interval_minutes is too large: {minutes}"
                ))
            })?;
            return Ok(Trigger::Interval(Duration::from_secs(secs)));
        }

        if !self.post_times.is_empty() {
            let mut times = Vec::with_capacity(self.post_times.len());
            for raw in &self.post_times {
                let time = parse_post_time(raw)?;
                if !times.contains(&time) {
                    times.push(time);
                }
            }
            return Ok(Trigger::ClockTimes(times));
        }

        distributed_times(self.posts_per_day).map(Trigger::ClockTimes)
    }

    #[must_use]
    pub fn min_interval(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.min_minutes_between_posts).unwrap_or(i64::MAX);
        chrono::Duration::minutes(minutes.min(i64::MAX / 60_000))
    }

    #[must_use]
    pub fn initial_lookback(&self) -> chrono::Duration {
        hours(self.initial_lookback_hours)
    }

    #[must_use]
    pub fn extended_lookback(&self) -> chrono::Duration {
        hours(self.extended_lookback_hours)
    }
}

fn hours(h: u64) -> chrono::Duration {
    let h = i64::try_from(h).unwrap_or(i64::MAX);
    chrono::Duration::hours(h.min(i64::MAX / 3_600_000))
}

/// Spread `posts_per_day` posts over the day.
///
/// One, two, and three posts use fixed editorial slots; more are spaced every
/// `24 / n` hours starting at 08:00.
fn distributed_times(posts_per_day: u32) -> Result<Vec<NaiveTime>, ConfigError> {
    let hours: Vec<u32> = match posts_per_day {
        1 => vec![12],
        2 => vec![9, 18],
        3 => vec![9, 14, 19],
        n @ 4..=24 => {
            let step = 24 / n;
            (0..n).map(|i| (8 + i * step) % 24).collect()
        }
        other => {
            return Err(ConfigError::Validation(format!(
                "schedule.posts_per_day must be within 1..=24, got {other}"
            )))
        }
    };

    let mut times = Vec::with_capacity(hours.len());
    for h in hours {
        let time = NaiveTime::from_hms_opt(h, 0, 0).ok_or_else(|| {
            ConfigError::Validation(format!("computed invalid hour {h} for posts_per_day"))
        })?;
        if !times.contains(&time) {
            times.push(time);
        }
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> ScheduleConfig {
        ScheduleConfig {
            post_times: Vec::new(),
            interval_minutes: None,
            ..ScheduleConfig::default()
        }
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_schedule_posts_every_two_hours() {
        let trigger = ScheduleConfig::default().trigger().unwrap();
        let Trigger::ClockTimes(times) = trigger else {
            panic!("expected clock times");
        };
        assert_eq!(times.len(), 12);
        assert_eq!(times[0], hm(0, 0));
        assert_eq!(times[11], hm(22, 0));
    }

    #[test]
    fn interval_takes_precedence_over_post_times() {
        let cfg = ScheduleConfig {
            interval_minutes: Some(30),
            ..ScheduleConfig::default()
        };
        assert_eq!(
            cfg.trigger().unwrap(),
            Trigger::Interval(Duration::from_secs(1800))
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cfg = ScheduleConfig {
            interval_minutes: Some(0),
            ..ScheduleConfig::default()
        };
        assert!(matches!(cfg.trigger(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn overflowing_interval_is_rejected() {
        let cfg = ScheduleConfig {
            interval_minutes: Some(u64::MAX),
            ..ScheduleConfig::default()
        };
        assert!(matches!(cfg.trigger(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_post_time_is_rejected() {
        let cfg = ScheduleConfig {
            post_times: vec!["25:00".to_string()],
            ..ScheduleConfig::default()
        };
        assert!(matches!(cfg.trigger(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn duplicate_post_times_collapse() {
        let cfg = ScheduleConfig {
            post_times: vec!["09:30".to_string(), "09:30".to_string()],
            ..ScheduleConfig::default()
        };
        assert_eq!(cfg.trigger().unwrap(), Trigger::ClockTimes(vec![hm(9, 30)]));
    }

    #[test]
    fn posts_per_day_fixed_slots() {
        let mut cfg = schedule();
        cfg.posts_per_day = 1;
        assert_eq!(cfg.trigger().unwrap(), Trigger::ClockTimes(vec![hm(12, 0)]));
        cfg.posts_per_day = 2;
        assert_eq!(
            cfg.trigger().unwrap(),
            Trigger::ClockTimes(vec![hm(9, 0), hm(18, 0)])
        );
        cfg.posts_per_day = 3;
        assert_eq!(
            cfg.trigger().unwrap(),
            Trigger::ClockTimes(vec![hm(9, 0), hm(14, 0), hm(19, 0)])
        );
    }

    #[test]
    fn posts_per_day_spread_from_eight() {
        let mut cfg = schedule();
        cfg.posts_per_day = 4;
        assert_eq!(
            cfg.trigger().unwrap(),
            Trigger::ClockTimes(vec![hm(8, 0), hm(14, 0), hm(20, 0), hm(2, 0)])
        );
    }

    #[test]
    fn posts_per_day_out_of_range_is_rejected() {
        let mut cfg = schedule();
        cfg.posts_per_day = 0;
        assert!(cfg.trigger().is_err());
        cfg.posts_per_day = 25;
        assert!(cfg.trigger().is_err());
    }

    #[test]
    fn cron_expressions_use_seconds_field() {
        let trigger = Trigger::ClockTimes(vec![hm(6, 15)]);
        assert_eq!(trigger.cron_expressions(), vec!["0 15 6 * * *".to_string()]);
    }

    #[test]
    fn durations_follow_config() {
        let cfg = ScheduleConfig::default();
        assert_eq!(cfg.min_interval(), chrono::Duration::hours(1));
        assert_eq!(cfg.initial_lookback(), chrono::Duration::hours(12));
        assert_eq!(cfg.extended_lookback(), chrono::Duration::hours(48));
    }
}
