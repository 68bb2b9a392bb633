//! Bounded pool for background executions.
//!
//! At most `max_concurrent` executions run at once and at most
//! `queue_capacity` more wait for a permit. A [`Slot`] must be reserved
//! before work is handed over, so a caller can refuse a submission before
//! changing any state.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// A reserved place in the pool. Releases itself on drop.
#[derive(Debug)]
pub struct Slot {
    pending: Arc<AtomicUsize>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    permits: Arc<Semaphore>,
    pending: Arc<AtomicUsize>,
    capacity: usize,
    tasks: Mutex<JoinSet<()>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(max_concurrent: usize, queue_capacity: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            pending: Arc::new(AtomicUsize::new(0)),
            capacity: max_concurrent.saturating_add(queue_capacity),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Running plus waiting executions the pool accepts.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reserved slots, whether running, waiting, or not yet spawned.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Reserve a slot, or `None` if the pool is full.
    pub fn reserve(&self) -> Option<Slot> {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .ok()
            .map(|_| Slot {
                pending: Arc::clone(&self.pending),
            })
    }

    /// Run `work` once a permit is free. The slot is held until it finishes.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(&self, slot: Slot, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(finished) = tasks.try_join_next() {
            log_join(finished);
        }
        tasks.spawn(async move {
            let _slot = slot;
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            work.await;
        });
    }

    /// Wait until every spawned execution, including ones spawned meanwhile,
    /// has finished.
    pub async fn wait_idle(&self) {
        loop {
            let mut batch = {
                let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *tasks)
            };
            if batch.is_empty() {
                return;
            }
            while let Some(finished) = batch.join_next().await {
                log_join(finished);
            }
        }
    }
}

fn log_join(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!(error = %e, "analysis execution panicked");
        } else {
            tracing::debug!(error = %e, "analysis execution cancelled");
        }
    }
}
