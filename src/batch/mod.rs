//! Bounded-concurrency fan-out with deterministic, submission-ordered
//! results.
//!
//! One scheduler is built at startup and shared across requests; permits
//! provide backpressure instead of per-request thread or task explosions.
//! Every unit of work is isolated: a failing or panicking unit is recorded
//! in its own slot and never aborts the batch.


use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

/// Terminal state of one unit of work.
#[derive(Debug)]
pub enum UnitOutcome<T> {
    /// The unit completed.
    Ok(T),
    /// The unit failed; the error message is attached.
    Failed(String),
    /// The unit was still running when the batch deadline elapsed.
    TimedOut,
}

impl<T> UnitOutcome<T> {
    /// Returns the value if the unit completed.
    pub fn ok(self) -> Option<T> {
        match self {
            UnitOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the unit completed.
    pub fn is_ok(&self) -> bool {
        matches!(self, UnitOutcome::Ok(_))
    }

    /// Returns `true` if the unit timed out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, UnitOutcome::TimedOut)
    }
}

/// Shared bounded scheduler for scoring fan-out.
pub struct BatchScheduler {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl BatchScheduler {
    /// Creates a scheduler running at most `workers` units concurrently.
    /// A worker count of zero is clamped to one.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Configured concurrency limit.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every unit under the concurrency limit and returns outcomes in
    /// submission order, regardless of completion order.
    ///
    /// With a `deadline`, units that have not finished when it elapses are
    /// abandoned and recorded as [`UnitOutcome::TimedOut`]; finished units
    /// keep their results (graceful degradation, not failure).
    #[instrument(skip(self, units), fields(units = units.len(), workers = self.workers))]
    pub async fn run<T, E, F, Fut>(
        &self,
        units: Vec<F>,
        deadline: Option<Duration>,
    ) -> Vec<UnitOutcome<T>>
    where
        T: Send + 'static,
        E: std::fmt::Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        let total = units.len();
        let mut outcomes: Vec<UnitOutcome<T>> =
            (0..total).map(|_| UnitOutcome::TimedOut).collect();
        if total == 0 {
            return outcomes;
        }

        let started = tokio::time::Instant::now();
        let mut join_set = JoinSet::new();

        for (index, unit) in units.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            join_set.spawn(async move {
                // The semaphore is never closed while the scheduler lives.
                let _permit = permits
                    .acquire()
                    .await
                    .expect("batch semaphore closed unexpectedly");
                // A panic in one unit must not take down the batch. Calling
                // `unit()` inside the caught future also covers a panic
                // raised while constructing it, so the index always
                // survives to its outcome slot.
                let result = AssertUnwindSafe(async move { unit().await })
                    .catch_unwind()
                    .await;
                (index, result)
            });
        }

        loop {
            let joined = match deadline {
                Some(limit) => {
                    let remaining = limit.saturating_sub(started.elapsed());
                    match tokio::time::timeout(remaining, join_set.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            let pending = join_set.len();
                            warn!(pending, "batch deadline elapsed, abandoning pending units");
                            join_set.abort_all();
                            break;
                        }
                    }
                }
                None => join_set.join_next().await,
            };

            match joined {
                None => break,
                Some(Ok((index, Ok(Ok(value))))) => {
                    outcomes[index] = UnitOutcome::Ok(value);
                }
                Some(Ok((index, Ok(Err(error))))) => {
                    debug!(index, %error, "batch unit failed");
                    outcomes[index] = UnitOutcome::Failed(error.to_string());
                }
                Some(Ok((index, Err(_panic)))) => {
                    warn!(index, "batch unit panicked");
                    outcomes[index] = UnitOutcome::Failed("unit panicked".to_string());
                }
                Some(Err(join_error)) => {
                    warn!(%join_error, "batch task aborted");
                }
            }
        }

        outcomes
    }
}

impl std::fmt::Debug for BatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScheduler")
            .field("workers", &self.workers)
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}
