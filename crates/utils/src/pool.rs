//! Bounded-concurrency dispatch for batched remote and filesystem work.
//!
//! Call sites pick small limits (1-4) to stay inside the remote rate
//! limit; the limit is a correctness concern, not a tuning knob.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Run every future with at most `limit` in flight, collecting results in
/// dispatch order.
pub async fn run_limited<I, F, T>(limit: usize, tasks: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    stream::iter(tasks)
        .buffered(limit.max(1))
        .collect::<Vec<_>>()
        .await
}

/// Like [`run_limited`] but results arrive in completion order.
pub async fn run_limited_unordered<I, F, T>(limit: usize, tasks: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    stream::iter(tasks)
        .buffer_unordered(limit.max(1))
        .collect::<Vec<_>>()
        .await
}
