//! Bounded-concurrency batch processing.
//!
//! The remote API tolerates a handful of concurrent requests, not a
//! thundering herd. [`process_batch`] runs a worker over a list of items in
//! fixed-size batches: batch N+1 does not start until every task in batch N
//! has resolved, bounding peak concurrency to the batch size. Within a batch
//! tasks run concurrently with no completion-order guarantee, but results
//! are always assembled back in input order.
//!
//! One item's failure never aborts its siblings - each slot in the returned
//! vector carries that item's own `Result`.

use futures::future;
use std::future::Future;

/// Runs `worker` over `items` with bounded concurrency.
///
/// Results are returned in input order; per-item failures are isolated in
/// their own `Result` slot. A `batch_size` of zero is treated as one.
pub async fn process_batch<I, T, E, F, Fut>(
    items: Vec<I>,
    batch_size: usize,
    worker: F,
) -> Vec<std::result::Result<T, E>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();

    loop {
        let batch: Vec<I> = remaining.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        let tasks: Vec<Fut> = batch.into_iter().map(&worker).collect();
        results.extend(future::join_all(tasks).await);
    }

    results
}
