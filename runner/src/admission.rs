//! Admission control: caps how many wrapped calls execute at once.
//!
//! A semaphore with `max_concurrency` permits, or nothing at all when the cap
//! is `0`. The permit is an RAII guard so the slot is given back on every exit
//! path of a worker, including task abort.

use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct Admission {
    slots: Option<Arc<Semaphore>>,
}

/// A held concurrency slot. Dropping it releases the slot.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct AdmissionPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl AdmissionPermit {
    /// Give the slot back. Equivalent to dropping the permit.
    pub fn release(self) {}
}

impl Admission {
    /// `max_concurrency == 0` admits everything immediately.
    #[must_use]
    pub fn new(max_concurrency: usize) -> Self {
        let slots = (max_concurrency > 0).then(|| Arc::new(Semaphore::new(max_concurrency)));
        Self { slots }
    }

    /// Wait for a free slot.
    ///
    /// Fails only if the semaphore was closed, which the runner never does.
    pub async fn acquire(&self) -> Result<AdmissionPermit, AcquireError> {
        let permit = match &self.slots {
            Some(slots) => Some(Arc::clone(slots).acquire_owned().await?),
            None => None,
        };
        Ok(AdmissionPermit { _permit: permit })
    }

    /// Free slots right now; `None` when unbounded.
    #[must_use]
    pub fn available(&self) -> Option<usize> {
        self.slots.as_ref().map(|slots| slots.available_permits())
    }
}
