//! Parallel index harness for the acceleration phase.
//!
//! Contract: given `[lo, hi)` and a per-index callable, run the callable
//! for every index exactly once across a small pool of OS threads, and
//! return only after all of them have completed.
//!
//! Scheduling is dynamic with chunking: a mutex-protected cursor hands out
//! FIFO chunks of `max(1, n / (10·W))` indices, and each worker processes
//! its chunk sequentially before asking for the next. Execution order
//! across indices is unspecified. Workers are scoped threads spawned per
//! call, so the callable may borrow freely from the caller's stack.
//!
//! A panicking callable does not take the process down mid-phase: every
//! worker is joined first, then the first panic is surfaced as a
//! [`ParallelError`].

use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;

use thiserror::Error;

/// How many chunks each worker should see on average.
const CHUNKS_PER_WORKER: usize = 10;

#[derive(Debug, Error)]
pub enum ParallelError {
    #[error("worker thread panicked: {0}")]
    WorkerPanic(String),
}

/// Default worker count: twice the hardware parallelism, a hyperthreading
/// heuristic that keeps cores busy while some workers wait on the cursor.
pub fn default_workers() -> usize {
    2 * thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Run `f` once for every index in `[lo, hi)` across `workers` threads.
pub fn for_each<F>(lo: usize, hi: usize, workers: usize, f: F) -> Result<(), ParallelError>
where
    F: Fn(usize) + Sync,
{
    map(lo, hi, workers, |i| f(i)).map(|_| ())
}

/// Run `f` once for every index in `[lo, hi)` across `workers` threads and
/// collect the results in index order.
pub fn map<T, F>(lo: usize, hi: usize, workers: usize, f: F) -> Result<Vec<T>, ParallelError>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    if hi <= lo {
        return Ok(Vec::new());
    }

    let n = hi - lo;
    let workers = workers.max(1);
    let chunk = (n / (CHUNKS_PER_WORKER * workers)).max(1);

    // Monotone claim cursor; chunks are handed out FIFO.
    let cursor = Mutex::new(lo);
    // Completed chunks as (start index, values); reassembled after the join.
    let done: Mutex<Vec<(usize, Vec<T>)>> = Mutex::new(Vec::new());

    let outcome: Result<(), ParallelError> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| loop {
                let start = {
                    // A worker that panicked while holding the lock must
                    // not wedge the rest of the pool; take the guard back
                    // and keep draining.
                    let mut next = match cursor.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    if *next >= hi {
                        return;
                    }
                    let start = *next;
                    *next = (start + chunk).min(hi);
                    start
                };
                let end = (start + chunk).min(hi);

                let mut values = Vec::with_capacity(end - start);
                for i in start..end {
                    values.push(f(i));
                }

                let mut done = match done.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                done.push((start, values));
            }));
        }

        // Join everything before reporting, so no worker is still touching
        // caller state when the error escapes.
        let mut first_panic = None;
        for handle in handles {
            if let Err(payload) = handle.join() {
                first_panic.get_or_insert_with(|| panic_message(&payload));
            }
        }
        match first_panic {
            Some(msg) => Err(ParallelError::WorkerPanic(msg)),
            None => Ok(()),
        }
    });
    outcome?;

    let mut parts = match done.into_inner() {
        Ok(parts) => parts,
        Err(poisoned) => poisoned.into_inner(),
    };
    parts.sort_by_key(|(start, _)| *start);

    let mut out = Vec::with_capacity(n);
    for (_, mut values) in parts {
        out.append(&mut values);
    }
    debug_assert_eq!(out.len(), n);
    Ok(out)
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
