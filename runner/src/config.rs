//! Runner configuration.
//!
//! [`RunnerConfig`] is plain data: it can be built in code with the `with_*`
//! helpers or deserialized from the `search` section of the config file. It is
//! validated once, when the [`Runner`](crate::Runner) is constructed, and never
//! changes afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::RunnerError;

/// One `(max_calls, period_sec)` quota.
///
/// Field names follow the `rate_limit` entries of the config file:
///
/// ```json
/// { "max_calls": 100, "period_sec": 5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateWindowConfig {
    pub max_calls: u32,
    pub period_sec: f64,
}

impl RateWindowConfig {
    #[must_use]
    pub const fn new(max_calls: u32, period_sec: f64) -> Self {
        Self {
            max_calls,
            period_sec,
        }
    }

    /// Period as a `Duration`, or `None` when `period_sec` is not a positive
    /// number of seconds that a `Duration` can hold.
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.period_sec)
            .ok()
            .filter(|period| !period.is_zero())
    }

    fn validate(&self, index: usize) -> Result<(), RunnerError> {
        if self.max_calls == 0 {
            return Err(RunnerError::ZeroMaxCalls { index });
        }
        if self.period().is_none() {
            return Err(RunnerError::InvalidPeriod {
                index,
                period_sec: self.period_sec,
            });
        }
        Ok(())
    }
}

/// Uniform random delay between retry attempts, in milliseconds (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for BackoffRange {
    fn default() -> Self {
        Self::from_secs(1, 6)
    }
}

impl BackoffRange {
    #[must_use]
    pub const fn from_secs(min: u64, max: u64) -> Self {
        Self {
            min_ms: min * 1000,
            max_ms: max * 1000,
        }
    }

    #[must_use]
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Draw one delay from the range.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::random_range(self.min_ms..=self.max_ms))
    }
}

/// Immutable settings for one [`Runner`](crate::Runner).
///
/// Defaults match a bare runner: unbounded concurrency, no rate windows, a
/// single attempt per call, and no output collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum calls executing at once. `0` means unbounded.
    pub max_concurrency: usize,
    /// Quotas shared by every worker, evaluated in order.
    #[serde(alias = "rate_limit")]
    pub rate_windows: Vec<RateWindowConfig>,
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    /// Keep every produced value for [`Runner::get_output`](crate::Runner::get_output).
    pub collect_output: bool,
    /// Store collected values as JSON text and decode them on drain.
    pub serialize_output: bool,
    /// Log a progress line every N completed calls.
    pub progress_log_interval: Option<u64>,
    /// Delay range between attempts of a failing call.
    pub backoff: BackoffRange,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            rate_windows: Vec::new(),
            max_attempts: 1,
            collect_output: false,
            serialize_output: false,
            progress_log_interval: None,
            backoff: BackoffRange::default(),
        }
    }
}

impl RunnerConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_rate_window(mut self, max_calls: u32, period_sec: f64) -> Self {
        self.rate_windows
            .push(RateWindowConfig::new(max_calls, period_sec));
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn collecting(mut self) -> Self {
        self.collect_output = true;
        self
    }

    /// Collect output and carry it as JSON text until it is drained.
    pub fn serialized(mut self) -> Self {
        self.collect_output = true;
        self.serialize_output = true;
        self
    }

    pub fn with_progress_log_interval(mut self, every: u64) -> Self {
        self.progress_log_interval = Some(every);
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffRange) -> Self {
        self.backoff = backoff;
        self
    }

    /// Check every field; the first problem found is returned.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(RunnerError::ConcurrencyTooLarge {
                requested: self.max_concurrency,
                max: Semaphore::MAX_PERMITS,
            });
        }
        for (index, window) in self.rate_windows.iter().enumerate() {
            window.validate(index)?;
        }
        if self.max_attempts == 0 {
            return Err(RunnerError::ZeroAttempts);
        }
        if self.backoff.min_ms > self.backoff.max_ms {
            return Err(RunnerError::InvertedBackoff {
                min_ms: self.backoff.min_ms,
                max_ms: self.backoff.max_ms,
            });
        }
        if self.progress_log_interval == Some(0) {
            return Err(RunnerError::ZeroProgressInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RunnerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.max_concurrency, 0);
        assert!(!config.collect_output);
    }

    #[test]
    fn rejects_non_positive_period() {
        let config = RunnerConfig::default()
            .with_rate_window(5, 1.0)
            .with_rate_window(5, 0.0);
        assert_eq!(
            config.validate(),
            Err(RunnerError::InvalidPeriod {
                index: 1,
                period_sec: 0.0
            })
        );

        let config = RunnerConfig::default().with_rate_window(5, -2.5);
        assert!(matches!(
            config.validate(),
            Err(RunnerError::InvalidPeriod { index: 0, .. })
        ));

        let config = RunnerConfig::default().with_rate_window(5, f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_period_too_large_for_duration() {
        let window = RateWindowConfig::new(5, 1e20);
        assert_eq!(window.period(), None);

        let config = RunnerConfig::default().with_rate_window(5, 1e20);
        assert_eq!(
            config.validate(),
            Err(RunnerError::InvalidPeriod {
                index: 0,
                period_sec: 1e20
            })
        );
        assert_eq!(
            RateWindowConfig::new(5, 2.5).period(),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn rejects_zero_max_calls() {
        let config = RunnerConfig::default().with_rate_window(0, 1.0);
        assert_eq!(
            config.validate(),
            Err(RunnerError::ZeroMaxCalls { index: 0 })
        );
    }

    #[test]
    fn rejects_zero_attempts_and_zero_progress_interval() {
        let config = RunnerConfig::default().with_max_attempts(0);
        assert_eq!(config.validate(), Err(RunnerError::ZeroAttempts));

        let config = RunnerConfig::default().with_progress_log_interval(0);
        assert_eq!(config.validate(), Err(RunnerError::ZeroProgressInterval));
    }

    #[test]
    fn rejects_inverted_backoff() {
        let config = RunnerConfig::default().with_backoff(BackoffRange::from_millis(10, 1));
        assert!(matches!(
            config.validate(),
            Err(RunnerError::InvertedBackoff { .. })
        ));
    }

    #[test]
    fn deserializes_rate_limit_alias() {
        let raw = r#"{
            "max_concurrency": 100,
            "rate_limit": [{ "max_calls": 100, "period_sec": 5 }],
            "max_attempts": 3
        }"#;
        let config: RunnerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.max_concurrency, 100);
        assert_eq!(config.rate_windows, vec![RateWindowConfig::new(100, 5.0)]);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff, BackoffRange::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn backoff_sample_stays_in_range() {
        let backoff = BackoffRange::default();
        for _ in 0..200 {
            let delay = backoff.sample();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay <= Duration::from_secs(6));
        }

        let fixed = BackoffRange::from_millis(7, 7);
        assert_eq!(fixed.sample(), Duration::from_millis(7));
    }
}
