//! Scoped worker pool
//!
//! Workers borrow the caller's data, pull job indices from a shared channel
//! and are all joined before [`run_parallel`] returns. A panicking job is
//! reported in its slot instead of tearing the pool down.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::unbounded;

/// Outcome of one job: its value, or the panic message
pub type JobResult<R> = Result<R, String>;

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Run `job` over every item on up to `workers` threads
///
/// Results keep the order of `items`. With one worker or one item the jobs
/// run on the calling thread.
pub fn run_parallel<T, R, F>(items: &[T], workers: usize, job: F) -> Vec<JobResult<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let guarded = |item: &T| {
        panic::catch_unwind(AssertUnwindSafe(|| job(item))).map_err(|p| panic_message(&*p))
    };

    let workers = workers.clamp(1, items.len().max(1));
    if workers == 1 {
        return items.iter().map(guarded).collect();
    }

    let (job_tx, job_rx) = unbounded::<usize>();
    let (result_tx, result_rx) = unbounded::<(usize, JobResult<R>)>();
    for index in 0..items.len() {
        // receiver is alive until the scope below ends
        let _ = job_tx.send(index);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let guarded = &guarded;
            scope.spawn(move || {
                for index in job_rx {
                    if result_tx.send((index, guarded(&items[index]))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<JobResult<R>>> = (0..items.len()).map(|_| None).collect();
    for (index, result) in result_rx {
        slots[index] = Some(result);
    }
    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err("job did not run".to_string())))
        .collect()
}
