//! Bounded, rate-limited, retrying runner for fan-out calls.
//!
//! # Architecture
//!
//! A [`Runner`] owns one worker task per submitted call. Every worker goes
//! through the same gates before it invokes the wrapped call:
//!
//! | Gate | Module | Behavior |
//! |------|--------|----------|
//! | Admission | [`admission`] | At most `max_concurrency` calls in flight (`0` = unbounded) |
//! | Rate limit | [`rate_limit`] | Every configured window, in order, once per attempt |
//! | Retry | this module | Up to `max_attempts` attempts, random backoff in between |
//!
//! ```text
//! submit(call, args) ──► worker: acquire ─► [throttle ─► call(args)]* ─► collect ─► release
//!                                                   │            │
//!                                                   └─ backoff ◄─┘ (Failed, attempts left)
//! ```
//!
//! # Error Handling
//!
//! Only construction can fail ([`RunnerError`]). Per-call failures never reach
//! the caller of [`Runner::submit`], [`Runner::join`] or [`Runner::get_output`]:
//! they are logged (with the call's arguments once retries are exhausted) and
//! the call simply contributes nothing to the collected output. Callers that
//! need per-call outcomes should put a correlation key in the arguments and
//! look for it in the output.
//!
//! # Usage
//!
//! ```ignore
//! let config = RunnerConfig::default()
//!     .with_max_concurrency(100)
//!     .with_rate_window(100, 5.0)
//!     .with_max_attempts(3)
//!     .serialized();
//! let mut runner = Runner::new(config)?;
//! for video_id in ids {
//!     let client = client.clone();
//!     runner.submit(
//!         move |params| {
//!             let client = client.clone();
//!             async move { Ok(Some(client.search_one(&params).await?)) }
//!         },
//!         params_for(video_id),
//!     );
//! }
//! runner.join().await;
//! let responses = runner.get_output().unwrap_or_default();
//! ```

pub mod admission;
mod clock;
mod config;
mod error;
mod output;
pub mod rate_limit;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio::time::Instant;

use admission::Admission;
use output::{Encoding, OutputCollection, OutputSink};
use rate_limit::RateLimiter;

pub use clock::format_elapsed;
pub use config::{BackoffRange, RateWindowConfig, RunnerConfig};
pub use error::{CallError, RunnerError};
pub use rate_limit::WindowStats;

/// Counters and window state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerStats {
    /// Calls submitted since the runner was created.
    pub submitted: u64,
    /// Calls that returned successfully (with or without a value).
    pub completed: u64,
    /// Calls that failed on their last attempt.
    pub failed: u64,
    /// Calls abandoned through [`CallError::Cancelled`].
    pub cancelled: u64,
    /// Free concurrency slots; `None` when concurrency is unbounded.
    pub available_slots: Option<usize>,
    /// One entry per configured rate window, in configured order.
    pub windows: Vec<WindowStats>,
}

struct Shared<T> {
    admission: Admission,
    limiter: RateLimiter,
    sink: Option<OutputSink<T>>,
    max_attempts: u32,
    backoff: BackoffRange,
    progress_log_interval: Option<u64>,
    completed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl<T: Serialize> Shared<T> {
    fn record_success(&self, call_id: u64, value: Option<T>) {
        if let (Some(sink), Some(value)) = (&self.sink, value) {
            sink.push(call_id, value);
        }

        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(every) = self.progress_log_interval
            && completed % every == 0
        {
            tracing::info!(completed, "running iter {completed}");
        }
    }
}

/// Runs submitted calls concurrently under the configured gates.
///
/// `T` is the value a call produces. Calls return `Ok(None)` when they have
/// nothing to contribute; those are counted as completed but never collected.
///
/// Dropping a runner aborts any call that has not finished; use
/// [`Runner::join`] first to let them run to completion.
pub struct Runner<T> {
    shared: Arc<Shared<T>>,
    output: Option<OutputCollection<T>>,
    tasks: JoinSet<()>,
    handle: Handle,
    started: Instant,
    submitted: u64,
}

impl<T> fmt::Debug for Runner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("submitted", &self.submitted)
            .field("pending", &self.tasks.len())
            .field("collecting", &self.output.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Runner<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Build a runner on the current tokio runtime.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let handle = Handle::try_current().map_err(|_| RunnerError::NoRuntime)?;
        Self::with_handle(config, handle)
    }

    /// Build a runner whose workers are spawned on `handle`.
    pub fn with_handle(config: RunnerConfig, handle: Handle) -> Result<Self, RunnerError> {
        config.validate()?;

        let (sink, output) = if config.collect_output {
            let encoding = if config.serialize_output {
                Encoding::Json
            } else {
                Encoding::Native
            };
            let (sink, collection) = output::channel(encoding);
            (Some(sink), Some(collection))
        } else {
            (None, None)
        };

        let shared = Shared {
            admission: Admission::new(config.max_concurrency),
            limiter: RateLimiter::new(&config.rate_windows),
            sink,
            max_attempts: config.max_attempts,
            backoff: config.backoff,
            progress_log_interval: config.progress_log_interval,
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        };

        tracing::debug!(
            max_concurrency = config.max_concurrency,
            rate_windows = config.rate_windows.len(),
            max_attempts = config.max_attempts,
            collect_output = config.collect_output,
            serialize_output = config.serialize_output,
            "Runner created"
        );

        Ok(Self {
            shared: Arc::new(shared),
            output,
            tasks: JoinSet::new(),
            handle,
            started: Instant::now(),
            submitted: 0,
        })
    }

    /// Queue `call(args)` for concurrent execution and return immediately.
    ///
    /// `args` is cloned for every attempt and printed with `Debug` if the call
    /// ultimately fails.
    pub fn submit<A, F, Fut>(&mut self, call: F, args: A)
    where
        A: Clone + fmt::Debug + Send + Sync + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, CallError>> + Send + 'static,
    {
        self.submitted += 1;
        let call_id = self.submitted;
        let shared = Arc::clone(&self.shared);
        self.tasks
            .spawn_on(run_call(call_id, call, args, shared), &self.handle);
    }

    /// Wait until every submitted call has finished, then forget them.
    ///
    /// The runner can take a new wave of submissions afterwards.
    pub async fn join(&mut self) {
        let pending = self.tasks.len();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_cancelled() {
                    tracing::info!("worker cancelled");
                } else {
                    tracing::error!(error = %e, "worker panicked");
                }
            }
        }
        tracing::debug!(
            joined = pending,
            elapsed = %self.elapsed_time(),
            "Runner wave finished"
        );
    }

    /// Drain the collected values in completion order.
    ///
    /// Returns `None` when the runner was not configured to collect output.
    /// Draining is destructive: a second call returns an empty list unless new
    /// calls completed in between.
    pub fn get_output(&mut self) -> Option<Vec<T>> {
        self.output.as_mut().map(OutputCollection::drain)
    }

    /// Number of calls submitted and not yet joined.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn stats(&self) -> RunnerStats {
        RunnerStats {
            submitted: self.submitted,
            completed: self.shared.completed.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
            cancelled: self.shared.cancelled.load(Ordering::Relaxed),
            available_slots: self.shared.admission.available(),
            windows: self.shared.limiter.snapshot(),
        }
    }

    /// Restart the elapsed-time clock, e.g. when work starts long after construction.
    pub fn reset_start_time(&mut self) {
        self.started = Instant::now();
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time as `H:MM:SS`.
    #[must_use]
    pub fn elapsed_time(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

async fn run_call<T, A, F, Fut>(call_id: u64, call: F, args: A, shared: Arc<Shared<T>>)
where
    T: Serialize + Send + 'static,
    A: Clone + fmt::Debug + Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<T>, CallError>> + Send + 'static,
{
    let permit = match shared.admission.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            tracing::error!(call_id, error = %e, "Admission closed; abandoning call");
            return;
        }
    };

    let mut attempt = 0;
    loop {
        attempt += 1;
        shared.limiter.throttle().await;

        let pending = call(args.clone());
        let outcome = pending.await;
        match outcome {
            Ok(value) => {
                shared.record_success(call_id, value);
                break;
            }
            Err(CallError::Cancelled) => {
                tracing::info!(call_id, attempt, "worker cancelled");
                shared.cancelled.fetch_add(1, Ordering::Relaxed);
                break;
            }
            Err(CallError::Failed(e)) if attempt < shared.max_attempts => {
                let delay = shared.backoff.sample();
                tracing::warn!(
                    call_id,
                    attempt,
                    max_attempts = shared.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %format!("{e:#}"),
                    "Call failed; sleeping before retry"
                );
                tokio::time::sleep(delay).await;
            }
            Err(CallError::Failed(e)) => {
                tracing::error!(
                    call_id,
                    attempts = attempt,
                    args = ?args,
                    error = %format!("{e:#}"),
                    "Call failed after exhausting retries"
                );
                shared.failed.fetch_add(1, Ordering::Relaxed);
                break;
            }
        }
    }

    permit.release();
}
