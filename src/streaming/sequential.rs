use std::future::Future;
use std::sync::Arc;

use futures::{Stream, StreamExt};

use super::stop::StopAfterError;
use crate::domain::ValidationOutcome;
use crate::engine::{EngineError, RuleSet, validate_shared};

/// Results in input order, one invocation at a time, without stopping on errors
pub(crate) fn sequential_invocations<St, F, Fut, O>(
    stream: St,
    invoke: F,
) -> impl Stream<Item = Result<O, EngineError>>
where
    St: Stream,
    F: FnMut(St::Item) -> Fut,
    Fut: Future<Output = Result<O, EngineError>>,
{
    // `then` does not poll upstream while the current invocation is pending
    stream.then(invoke)
}

/// Validate items strictly one after another, in arrival order
///
/// The next item is not pulled from upstream until the current item's
/// outcome has been yielded. Every item is validated; the stream ends
/// after the first execution failure, which is yielded as `Err`.
///
/// # Example
/// ```rust,ignore
/// let outcomes: Vec<_> = validate_sequential(queue_items, Arc::new(order_rules))
///     .collect()
///     .await;
/// ```
pub fn validate_sequential<St, S>(
    stream: St,
    rules: Arc<S>,
) -> impl Stream<Item = Result<ValidationOutcome, EngineError>>
where
    St: Stream,
    St::Item: Send + 'static,
    S: RuleSet<St::Item> + ?Sized + 'static,
{
    StopAfterError::new(sequential_invocations(stream, move |item| {
        validate_shared(item, Arc::clone(&rules))
    }))
}
