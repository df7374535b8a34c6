//! Runner error types.
//!
//! Two very different things live here:
//!
//! - [`RunnerError`] is returned by [`Runner::new`](crate::Runner::new) when the
//!   configuration cannot work. It is the only error a caller of the runner ever
//!   sees.
//! - [`CallError`] is what a wrapped call hands back to the retry loop. It never
//!   leaves the runner; failures surface through logs and through the absence
//!   of a value in the collected output.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunnerError {
    #[error("rate window {index}: max_calls must be greater than zero")]
    ZeroMaxCalls { index: usize },
    #[error(
        "rate window {index}: period_sec must be a positive number of seconds that fits a Duration (got {period_sec})"
    )]
    InvalidPeriod { index: usize, period_sec: f64 },
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("backoff range is inverted: min {min_ms}ms > max {max_ms}ms")]
    InvertedBackoff { min_ms: u64, max_ms: u64 },
    #[error("progress_log_interval must be greater than zero when set")]
    ZeroProgressInterval,
    #[error("max_concurrency {requested} exceeds the supported maximum of {max}")]
    ConcurrencyTooLarge { requested: usize, max: usize },
    #[error("a runner must be created from within a tokio runtime")]
    NoRuntime,
}

/// Outcome of one failed attempt of a wrapped call.
///
/// Any `std::error::Error` converts into [`CallError::Failed`], so wrapped calls
/// can use `?` on their own error types.
#[derive(Debug)]
pub enum CallError {
    /// Cooperative cancellation: the call is abandoned without retry.
    Cancelled,
    /// Any other failure; retried while attempts remain.
    Failed(anyhow::Error),
}

impl CallError {
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self::Failed(error.into())
    }

    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Failed(anyhow::Error::msg(message))
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("call cancelled"),
            Self::Failed(error) => write!(f, "{error:#}"),
        }
    }
}

impl<E> From<E> for CallError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::Failed(anyhow::Error::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("upstream returned 503")]
    struct Upstream;

    fn fallible() -> Result<u8, CallError> {
        let upstream: Result<u8, Upstream> = Err(Upstream);
        Ok(upstream?)
    }

    #[test]
    fn question_mark_converts_into_failed() {
        let err = fallible().unwrap_err();
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "upstream returned 503");
    }

    #[test]
    fn cancelled_display() {
        assert!(CallError::Cancelled.is_cancelled());
        assert_eq!(CallError::Cancelled.to_string(), "call cancelled");
        assert_eq!(CallError::msg("boom").to_string(), "boom");
    }
}
