use std::future::Future;
use std::sync::Arc;

use futures::{Stream, StreamExt};

use super::stop::StopAfterError;
use crate::domain::ValidationOutcome;
use crate::engine::{EngineError, RuleSet, validate_shared};

/// Default number of invocations allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Completion-ordered results with bounded overlap, without stopping on errors
pub(crate) fn parallel_invocations<St, F, Fut, O>(
    stream: St,
    invoke: F,
    concurrency: usize,
) -> impl Stream<Item = Result<O, EngineError>>
where
    St: Stream,
    F: FnMut(St::Item) -> Fut,
    Fut: Future<Output = Result<O, EngineError>>,
{
    // A slot frees as soon as its invocation resolves, whether Ok or Err
    stream.map(invoke).buffer_unordered(concurrency.max(1))
}

/// Validate up to `concurrency` items at once, yielding in completion order
///
/// Upstream is only pulled while a slot is free. Every accepted item is
/// validated; nothing is skipped. The stream ends after the first
/// execution failure, and invocations still in flight at that point are
/// dropped with the stream. A `concurrency` of zero is treated as one.
///
/// # Example
/// ```rust,ignore
/// // Overlap remote lookups across items, at most 8 connections at a time
/// let outcomes = validate_parallel(batch, Arc::new(address_rules), 8);
/// ```
pub fn validate_parallel<St, S>(
    stream: St,
    rules: Arc<S>,
    concurrency: usize,
) -> impl Stream<Item = Result<ValidationOutcome, EngineError>>
where
    St: Stream,
    St::Item: Send + 'static,
    S: RuleSet<St::Item> + ?Sized + 'static,
{
    StopAfterError::new(parallel_invocations(
        stream,
        move |item| validate_shared(item, Arc::clone(&rules)),
        concurrency,
    ))
}
