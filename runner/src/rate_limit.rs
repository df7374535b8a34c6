//! Multi-window rate limiting shared by every worker of a runner.
//!
//! # Semantics
//!
//! Before each attempt, a caller walks the configured windows in order. For
//! each window:
//!
//! 1. `remaining = period - (now - window_start)`; if `remaining <= 0` the
//!    window resets (`calls_in_window = 0`, `window_start = now`).
//! 2. `calls_in_window` and `total_calls` are incremented unconditionally.
//! 3. If `calls_in_window > max_calls` the caller sleeps for `remaining`.
//!
//! The caller does not re-check a window after waking. This is a best-effort
//! cooperative limiter, not a strict token bucket: right after a sleep a burst
//! can slightly exceed `max_calls`.
//!
//! # Locking
//!
//! Window bookkeeping sits behind one `std::sync::Mutex`, held only for the
//! check-and-increment of a single window. Callers pass the gate one at a time
//! through an async turnstile, so a throttled caller's sleep delays the callers
//! queued behind it the same way it would with a blocking limiter, while
//! [`RateLimiter::snapshot`] stays readable during the sleep.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::RateWindowConfig;

#[derive(Debug, Clone)]
struct RateWindow {
    max_calls: u32,
    period: Duration,
    window_start: Instant,
    calls_in_window: u64,
    total_calls: u64,
}

impl RateWindow {
    /// `config` has been validated, so `period()` is always `Some`.
    fn new(config: &RateWindowConfig, now: Instant) -> Self {
        Self {
            max_calls: config.max_calls,
            period: config.period().unwrap_or(Duration::MAX),
            window_start: now,
            calls_in_window: 0,
            total_calls: 0,
        }
    }

    /// Count one call at `now`. Returns how long the caller must sleep, if at all.
    fn admit(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.period {
            self.calls_in_window = 0;
            self.window_start = now;
        }

        self.calls_in_window += 1;
        self.total_calls += 1;

        (self.calls_in_window > u64::from(self.max_calls))
            .then(|| self.period.saturating_sub(elapsed))
    }

    fn stats(&self) -> WindowStats {
        WindowStats {
            max_calls: self.max_calls,
            period: self.period,
            calls_in_window: self.calls_in_window,
            total_calls: self.total_calls,
        }
    }
}

/// Point-in-time view of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStats {
    pub max_calls: u32,
    pub period: Duration,
    pub calls_in_window: u64,
    pub total_calls: u64,
}

#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<Vec<RateWindow>>,
    turnstile: tokio::sync::Mutex<()>,
    window_count: usize,
}

impl RateLimiter {
    /// Windows start counting at construction time.
    #[must_use]
    pub fn new(configs: &[RateWindowConfig]) -> Self {
        let now = Instant::now();
        let windows: Vec<RateWindow> = configs
            .iter()
            .map(|config| RateWindow::new(config, now))
            .collect();
        Self {
            window_count: windows.len(),
            windows: Mutex::new(windows),
            turnstile: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window_count == 0
    }

    /// Pass the gate once, sleeping wherever a window is over quota.
    pub async fn throttle(&self) {
        if self.is_empty() {
            return;
        }

        let _turn = self.turnstile.lock().await;
        for index in 0..self.window_count {
            let Some((delay, window)) = self.admit(index, Instant::now()) else {
                continue;
            };
            tracing::info!(
                window = index,
                max_calls = window.max_calls,
                period_ms = window.period.as_millis(),
                calls_in_window = window.calls_in_window,
                total_calls = window.total_calls,
                delay_ms = delay.as_millis(),
                "Rate limit reached; sleeping before call"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn admit(&self, index: usize, now: Instant) -> Option<(Duration, WindowStats)> {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window = windows.get_mut(index)?;
        window.admit(now).map(|delay| (delay, window.stats()))
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<WindowStats> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(RateWindow::stats)
            .collect()
    }
}
