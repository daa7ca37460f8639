//! Worker coordination: thread-count decisions, contiguous partitioning,
//! and fault mapping for panics that escape a worker.

use std::any::Any;
use std::ops::Range;

use crate::config::Compression;
use crate::error::Error;

/// Hardware thread ceiling.
pub(crate) fn max_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Threads recommended for `items` work items with at least
/// `min_items_per_thread` items each, capped by the hardware ceiling.
pub(crate) fn recommended_threads(items: usize, min_items_per_thread: usize) -> usize {
    let cap = items / min_items_per_thread.max(1);
    max_threads().min(cap).max(1)
}

/// Worker count for one engine call over `items` work items.
pub(crate) fn thread_count(config: &Compression, items: usize) -> usize {
    if config.parallel {
        config
            .max_processors
            .min(recommended_threads(items, 1))
            .max(1)
    } else {
        1
    }
}

/// Split `items` indices into `threads` contiguous ranges, as evenly as
/// integer division allows; the last range absorbs the remainder.
pub(crate) fn partition(items: usize, threads: usize) -> Vec<Range<usize>> {
    let per_thread = items / threads;
    (0..threads)
        .map(|i| {
            let begin = i * per_thread;
            let end = if i + 1 < threads { begin + per_thread } else { items };
            begin..end
        })
        .collect()
}

/// Map a panic payload that escaped a worker to a descriptive error.
pub(crate) fn fault_to_error(panic: Box<dyn Any + Send>) -> Error {
    if let Some(msg) = panic.downcast_ref::<String>() {
        Error::Unknown(msg.clone())
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        Error::Unknown((*msg).to_string())
    } else {
        Error::Unknown("Unknown error".to_string())
    }
}

/// Collect per-worker results in worker order, separating successful
/// payloads from failures. At most one error per worker can occur.
pub(crate) fn split_results<T>(results: Vec<crate::error::Result<T>>) -> (Vec<T>, Vec<Error>) {
    let mut ok = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => ok.push(value),
            Err(e) => errors.push(e),
        }
    }
    (ok, errors)
}
