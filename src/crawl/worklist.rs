// src/crawl/worklist.rs
// =============================================================================
// The bookkeeping both crawl stages share.
//
// A Worklist owns:
// - the set of spawned tasks (a tokio JoinSet)
// - the outstanding-work counter
//
// Workers never touch shared collections. Each task RETURNS its result, and
// the single loop that owns the Worklist pulls results out with next().
// The counter goes up in dispatch() before the task is spawned and down
// exactly once when next() hands back that task's result, so the crawl is
// finished precisely when next() returns None.
//
// Rust concepts:
// - JoinSet: a collection of spawned tasks you can await one at a time
// - catch_unwind: turns a panic inside a future into an Err value
// - Semaphore: a counter of permits, our admission gate
// =============================================================================

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub(crate) struct Worklist<T> {
    tasks: JoinSet<T>,
    outstanding: usize,
}

impl<T: Send + 'static> Worklist<T> {
    pub(crate) fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            outstanding: 0,
        }
    }

    /// Spawns `work` as its own task.
    ///
    /// If `work` panics, `on_panic` builds the result instead, so every
    /// dispatched unit still reports back.
    pub(crate) fn dispatch<F, P>(&mut self, work: F, on_panic: P)
    where
        F: Future<Output = T> + Send + 'static,
        P: FnOnce() -> T + Send + 'static,
    {
        self.outstanding += 1;
        self.tasks.spawn(async move {
            match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(_) => on_panic(),
            }
        });
    }

    /// Waits for the next finished unit. None once nothing is outstanding.
    pub(crate) async fn next(&mut self) -> Option<T> {
        while self.outstanding > 0 {
            match self.tasks.join_next().await {
                Some(Ok(result)) => {
                    self.outstanding -= 1;
                    return Some(result);
                }
                Some(Err(join_error)) => {
                    // Only reachable if the runtime is shutting down,
                    // panics are already caught inside the task
                    self.outstanding -= 1;
                    warn!(error = %join_error, "crawl task did not complete");
                }
                None => {
                    // JoinSet is empty, so the counter must be too
                    debug_assert_eq!(self.outstanding, 0);
                    self.outstanding = 0;
                }
            }
        }
        None
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding
    }
}

/// Waits for a slot in `gate`, unless the crawl is cancelled first.
///
/// Returns None when cancelled. The permit frees its slot when dropped, so
/// holding it in a local for the duration of the fetch releases it on every
/// exit path.
pub(crate) async fn admit(
    gate: &Arc<Semaphore>,
    cancel: &CancellationToken,
) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = Arc::clone(gate).acquire_owned() => permit.ok(),
    }
}
