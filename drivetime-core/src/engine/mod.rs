//! Concurrent batch fetch across the (departure x traffic model) task set.
//!
//! One round = one bounded rayon pool over the outstanding tasks. Tasks
//! whose call never succeeded roll into the next round; rounds after the
//! first run with a smaller pool, since repeated failure usually means the
//! remote service is degraded. The round boundary is a full barrier — a new
//! round only starts once every task of the previous one has resolved.

mod progress;
mod table;

pub use progress::{FetchProgress, SilentProgress, StdoutProgress};
pub use table::{DurationTable, ModelPair};

use rayon::prelude::*;
use std::sync::Mutex;
use std::time::Duration;

use crate::assemble::round_to_tenth;
use crate::domain::FetchTask;
use crate::maps::RouteProvider;

/// Retry schedule for a batch fetch.
///
/// Worker counts are two fixed tiers; per-task attempts back off linearly
/// (`attempt * base_delay` before attempt 2, 3, ...). All knobs are plain
/// configuration, not derived at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Rounds before leftover failures are dropped.
    pub max_rounds: usize,
    /// Workers for the first round.
    pub first_round_workers: usize,
    /// Workers for every retry round.
    pub retry_workers: usize,
    /// Local attempts per task within a round.
    pub attempts_per_task: u32,
    /// Base delay of the linear backoff between local attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            first_round_workers: 30,
            retry_workers: 10,
            attempts_per_task: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    fn workers_for_round(&self, round: usize) -> usize {
        let n = if round == 0 {
            self.first_round_workers
        } else {
            self.retry_workers
        };
        n.max(1)
    }
}

/// Result of a batch run: the partial table plus every task that never
/// succeeded, for caller-visible warnings.
#[derive(Debug)]
pub struct BatchOutcome {
    pub table: DurationTable,
    pub failed: Vec<FetchTask>,
}

impl BatchOutcome {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Run every task to completion or final failure.
///
/// Individual call failures never escape as errors; the only panics are
/// programmer errors (a thread pool that cannot be built). An empty task
/// set returns an empty table without touching the provider.
pub fn run_batch(
    tasks: &[FetchTask],
    provider: &dyn RouteProvider,
    policy: &RetryPolicy,
    progress: &dyn FetchProgress,
) -> BatchOutcome {
    let total = tasks.len();
    let table = Mutex::new(DurationTable::new());
    let mut pending: Vec<FetchTask> = tasks.to_vec();

    let mut round = 0;
    while !pending.is_empty() && round < policy.max_rounds {
        let workers = policy.workers_for_round(round);
        progress.on_round_start(round, pending.len(), workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to build fetch thread pool");

        // Completion order within the round is unspecified; every merge
        // into the shared table happens under the lock.
        let still_failed: Vec<FetchTask> = pool.install(|| {
            pending
                .par_iter()
                .filter_map(|task| match fetch_with_attempts(provider, task, policy) {
                    Some(minutes) => {
                        table
                            .lock()
                            .expect("result table lock poisoned")
                            .record(task.departure, task.model, minutes);
                        progress.on_task_done(task, true);
                        None
                    }
                    None => {
                        progress.on_task_done(task, false);
                        Some(task.clone())
                    }
                })
                .collect()
        });

        round += 1;
        progress.on_round_complete(round, still_failed.len());
        pending = still_failed;
    }

    progress.on_batch_complete(total - pending.len(), pending.len(), total);

    BatchOutcome {
        table: table.into_inner().expect("result table lock poisoned"),
        failed: pending,
    }
}

/// One task within one round: up to `attempts_per_task` calls, sleeping
/// `attempt * base_delay` before each retry. The sleep runs on the worker
/// slot owned by this task only.
fn fetch_with_attempts(
    provider: &dyn RouteProvider,
    task: &FetchTask,
    policy: &RetryPolicy,
) -> Option<f64> {
    for attempt in 0..policy.attempts_per_task {
        match provider.duration_in_traffic(
            task.origin,
            task.dest,
            task.departure_epoch(),
            task.model,
        ) {
            Ok(seconds) => return Some(round_to_tenth(f64::from(seconds) / 60.0)),
            Err(_) => {
                let next = attempt + 1;
                if next < policy.attempts_per_task {
                    std::thread::sleep(policy.base_delay * next);
                }
            }
        }
    }
    None
}
