//! Progress callbacks for batch fetches.

use crate::domain::FetchTask;

/// Observer for a batch fetch. Implementations must be shareable across
/// the worker pool.
pub trait FetchProgress: Send + Sync {
    /// A round is starting over `outstanding` tasks with `workers` workers.
    fn on_round_start(&self, round: usize, outstanding: usize, workers: usize);

    /// One task resolved (success or final-attempt failure for this round).
    fn on_task_done(&self, task: &FetchTask, succeeded: bool);

    /// A round finished; `still_failed` tasks roll into the next round.
    fn on_round_complete(&self, round: usize, still_failed: usize);

    /// The whole batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_round_start(&self, round: usize, outstanding: usize, workers: usize) {
        if round == 0 {
            println!("Querying routing API: {outstanding} calls ({workers} workers)...");
        } else {
            println!("Retry round {round}: {outstanding} failed calls ({workers} workers)...");
        }
    }

    fn on_task_done(&self, _task: &FetchTask, _succeeded: bool) {}

    fn on_round_complete(&self, _round: usize, still_failed: usize) {
        if still_failed > 0 {
            println!("{still_failed} calls still failing, will retry...");
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("Fetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// No-op progress for library callers and tests.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_round_start(&self, _round: usize, _outstanding: usize, _workers: usize) {}
    fn on_task_done(&self, _task: &FetchTask, _succeeded: bool) {}
    fn on_round_complete(&self, _round: usize, _still_failed: usize) {}
    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
