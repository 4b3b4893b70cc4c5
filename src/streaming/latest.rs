use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{Fuse, FusedStream, Stream, StreamExt};
use pin_project_lite::pin_project;
use tracing::debug;

use super::stop::StopAfterError;
use crate::domain::ValidationOutcome;
use crate::engine::{EngineError, RuleSet, validate_shared};

type Invocation<O> = BoxFuture<'static, Result<O, EngineError>>;
type Invoker<T, O> = Box<dyn Fn(T) -> Invocation<O> + Send + Sync>;

pin_project! {
    /// Stream adaptor that keeps only the newest item's validation alive
    ///
    /// At most one invocation is in flight. Whenever upstream has a newer
    /// item ready, the in-flight invocation is dropped at its current
    /// suspension point and replaced; its partial outcome is discarded and
    /// every resource its checks were holding is released.
    #[must_use = "streams do nothing unless polled"]
    pub struct LatestValidation<St, O = ValidationOutcome>
    where
        St: Stream,
    {
        #[pin]
        upstream: Fuse<St>,
        in_flight: Option<Invocation<O>>,
        start: Invoker<St::Item, O>,
        superseded: u64,
    }
}

impl<St, O> LatestValidation<St, O>
where
    St: Stream,
{
    /// Number of invocations cancelled so far because a newer item arrived
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

impl<St, O> Stream for LatestValidation<St, O>
where
    St: Stream,
{
    type Item = Result<O, EngineError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain upstream first so a stale invocation is never polled again
        while let Poll::Ready(Some(item)) = this.upstream.as_mut().poll_next(cx) {
            if this.in_flight.take().is_some() {
                *this.superseded += 1;
                debug!(superseded = *this.superseded, "In-flight validation superseded");
            }
            *this.in_flight = Some((this.start)(item));
        }

        if let Some(invocation) = this.in_flight.as_mut() {
            let result = ready!(invocation.as_mut().poll(cx));
            *this.in_flight = None;
            return Poll::Ready(Some(result));
        }

        if this.upstream.is_done() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<St, O> FusedStream for LatestValidation<St, O>
where
    St: Stream,
{
    fn is_terminated(&self) -> bool {
        self.in_flight.is_none() && self.upstream.is_done()
    }
}

/// Latest-wins results of `start` without stopping on errors
pub(crate) fn latest_invocations<St, O, F>(stream: St, start: F) -> LatestValidation<St, O>
where
    St: Stream,
    F: Fn(St::Item) -> Invocation<O> + Send + Sync + 'static,
{
    LatestValidation {
        upstream: stream.fuse(),
        in_flight: None,
        start: Box::new(start),
        superseded: 0,
    }
}

/// Latest-wins outcomes without stopping on errors
pub(crate) fn latest_outcomes<St, S>(stream: St, rules: Arc<S>) -> LatestValidation<St>
where
    St: Stream,
    St::Item: Send + 'static,
    S: RuleSet<St::Item> + ?Sized + 'static,
{
    latest_invocations(stream, move |item| validate_shared(item, Arc::clone(&rules)).boxed())
}

/// Validate only the most recent item, cancelling superseded work
///
/// If a new item arrives while an invocation is still running, that
/// invocation is cancelled at its next suspension point and never
/// produces an outcome. Items that complete before the next arrival are
/// yielded in completion order. The stream ends after the first
/// execution failure of a non-superseded invocation.
///
/// # Example
/// ```rust,ignore
/// // Re-validate a form field on every keystroke; only the last one counts
/// let mut outcomes = validate_latest(keystrokes, Arc::new(username_rules));
/// while let Some(outcome) = outcomes.next().await {
///     render(outcome?);
/// }
/// ```
pub fn validate_latest<St, S>(
    stream: St,
    rules: Arc<S>,
) -> StopAfterError<LatestValidation<St>>
where
    St: Stream,
    St::Item: Send + 'static,
    S: RuleSet<St::Item> + ?Sized + 'static,
{
    StopAfterError::new(latest_outcomes(stream, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ValidationContext, rules};
    use futures::channel::mpsc;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Rules that need a length over 3, decided after a 1000ms lookup
    fn slow_length_rules() -> impl RuleSet<String> {
        rules(|ctx: &mut ValidationContext<String>| {
            Box::pin(async move {
                ctx.field(|s: &String| s.clone())
                    .check_async("must be longer than 3", "min_len", |s| async move {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                        s.len() > 3
                    })
                    .await;
                Ok(())
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_item_never_emits() {
        let (tx, rx) = mpsc::unbounded::<String>();

        let producer = tokio::spawn(async move {
            tx.unbounded_send("A".to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            tx.unbounded_send("ABCD".to_string()).unwrap();
        });

        let outcomes: Vec<_> = validate_latest(rx, Arc::new(slow_length_rules()))
            .collect()
            .await;
        producer.await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].as_ref().unwrap().is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn completed_items_all_emit() {
        let (tx, rx) = mpsc::unbounded::<String>();
        let mut outcomes = validate_latest(rx, Arc::new(slow_length_rules()));

        tx.unbounded_send("A".to_string()).unwrap();
        let first = outcomes.next().await.unwrap().unwrap();

        tx.unbounded_send("ABCD".to_string()).unwrap();
        let second = outcomes.next().await.unwrap().unwrap();

        drop(tx);
        assert!(outcomes.next().await.is_none());
        assert!(!first.is_valid());
        assert!(second.is_valid());
    }

    #[tokio::test]
    async fn buffered_items_replace_each_other_before_running() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = started.clone();

        let counting = rules(move |ctx: &mut ValidationContext<u32>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                ctx.field(|n: &u32| *n).check("must be even", None, |n| n % 2 == 0);
                Ok(())
            })
        });

        let mut outcomes = latest_outcomes(stream::iter(vec![1u32, 3, 4]), Arc::new(counting));
        let only = outcomes.next().await.unwrap().unwrap();

        assert!(outcomes.next().await.is_none());
        assert!(only.is_valid());
        assert_eq!(outcomes.superseded(), 2);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    struct Connection {
        released: Arc<AtomicUsize>,
    }

    impl Drop for Connection {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_invocation_releases_resources() {
        let released = Arc::new(AtomicUsize::new(0));
        let appended = Arc::new(AtomicUsize::new(0));
        let (released_in_rules, appended_in_rules) = (released.clone(), appended.clone());

        let lookup_rules = rules(move |ctx: &mut ValidationContext<String>| {
            let released = released_in_rules.clone();
            let appended = appended_in_rules.clone();
            Box::pin(async move {
                ctx.field(|s: &String| s.clone())
                    .check_async("unknown user", "lookup", |name| async move {
                        let _conn = Connection { released };
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                        name != "ghost"
                    })
                    .await;
                appended.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        });

        let (tx, rx) = mpsc::unbounded::<String>();
        let mut outcomes = latest_outcomes(rx, Arc::new(lookup_rules));

        tx.unbounded_send("ghost".to_string()).unwrap();
        let first_poll = tokio::time::timeout(Duration::from_millis(200), outcomes.next()).await;
        assert!(first_poll.is_err(), "lookup should still be pending");

        tx.unbounded_send("alice".to_string()).unwrap();
        drop(tx);

        let outcome = outcomes.next().await.unwrap().unwrap();
        assert!(outcome.is_valid());
        assert!(outcomes.next().await.is_none());

        // Both connections closed; only the surviving invocation finished
        assert_eq!(released.load(Ordering::SeqCst), 2);
        assert_eq!(appended.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.superseded(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_failure_is_never_observed() {
        let flaky = rules(|ctx: &mut ValidationContext<String>| {
            Box::pin(async move {
                ctx.field(|s: &String| s.clone())
                    .try_check_async("unknown user", "lookup", |name| async move {
                        if name == "bad" {
                            tokio::time::sleep(Duration::from_millis(1000)).await;
                            Err("directory unavailable")
                        } else {
                            Ok(name.len() > 3)
                        }
                    })
                    .await?;
                Ok(())
            })
        });

        let (tx, rx) = mpsc::unbounded::<String>();
        let producer = tokio::spawn(async move {
            tx.unbounded_send("bad".to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            tx.unbounded_send("goodie".to_string()).unwrap();
        });

        let outcomes: Vec<_> = validate_latest(rx, Arc::new(flaky)).collect().await;
        producer.await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].as_ref().unwrap().is_valid());
    }

    #[tokio::test]
    async fn stream_ends_after_execution_failure() {
        let failing = rules(|ctx: &mut ValidationContext<String>| {
            Box::pin(async move {
                ctx.field(|s: &String| s.clone())
                    .try_check_async("lookup", None, |_| async {
                        Err::<bool, _>("directory unavailable")
                    })
                    .await
            })
        });

        let (tx, rx) = mpsc::unbounded::<String>();
        tx.unbounded_send("anyone".to_string()).unwrap();

        let mut outcomes = validate_latest(rx, Arc::new(failing));

        assert!(matches!(
            outcomes.next().await,
            Some(Err(EngineError::PredicateFailed { .. }))
        ));
        tx.unbounded_send("later".to_string()).unwrap();
        assert!(outcomes.next().await.is_none());
    }
}
