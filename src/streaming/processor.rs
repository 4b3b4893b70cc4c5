use std::pin::Pin;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::{FutureExt, Stream, StreamExt, future, stream};
use tracing::debug;

use super::error::{AbortOnError, ErrorPolicy, PipelineError};
use super::latest::latest_invocations;
use super::parallel::parallel_invocations;
use super::sequential::sequential_invocations;
use super::stop::StopAfterError;
use super::strategy::Strategy;
use crate::domain::SequencedOutcome;
use crate::engine::{EngineError, RuleSet, validate_shared};
use crate::io::IoError;

/// Type alias for a boxed source of items
type SourceStream<T> = Pin<Box<dyn Stream<Item = Result<T, IoError>> + Send>>;

/// Boxed stream of outcomes produced by [`StreamValidator::into_stream`]
pub type OutcomeStream = Pin<Box<dyn Stream<Item = Result<SequencedOutcome, PipelineError>> + Send>>;

/// Primary API for validating item streams
///
/// Collects one or more sources, combines them, and validates every item
/// with one rule set under the configured [`Strategy`]. Errors are routed
/// through an [`ErrorPolicy`]; the default aborts on the first one.
pub struct StreamValidator<T, S: ?Sized, P = AbortOnError> {
    rules: Arc<S>,
    error_policy: P,
    strategy: Strategy,
    stream_combinator: StreamCombinator,
    streams: Vec<SourceStream<T>>,
}

/// How to combine multiple sources before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamCombinator {
    /// Merge sources concurrently (interleaved) - DEFAULT
    /// Good for: independent sources, maximize I/O throughput
    #[default]
    Merge,

    /// Chain sources one after another
    /// Good for: sources whose relative order matters
    Chain,
}

impl<T, S> StreamValidator<T, S, AbortOnError>
where
    T: Send + 'static,
    S: RuleSet<T> + 'static,
{
    /// Create a validator owning `rules`
    ///
    /// # Example
    /// ```rust,ignore
    /// let report = StreamValidator::new(SignupRules::default())
    ///     .with_strategy(Strategy::parallel())
    ///     .add_source(CsvRecordStream::from_file("signups.csv").await?)
    ///     .run()
    ///     .await;
    /// ```
    pub fn new(rules: S) -> Self {
        Self::from_shared(Arc::new(rules))
    }
}

impl<T, S> StreamValidator<T, S, AbortOnError>
where
    T: Send + 'static,
    S: RuleSet<T> + ?Sized + 'static,
{
    /// Create a validator over rules shared with other pipelines
    pub fn from_shared(rules: Arc<S>) -> Self {
        Self {
            rules,
            error_policy: AbortOnError,
            strategy: Strategy::default(),
            stream_combinator: StreamCombinator::default(),
            streams: Vec::new(),
        }
    }
}

impl<T, S, P> StreamValidator<T, S, P>
where
    T: Send + 'static,
    S: RuleSet<T> + ?Sized + 'static,
    P: ErrorPolicy + 'static,
{
    /// Set the scheduling strategy (defaults to Sequential)
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Switch to the parallel strategy with `concurrency` slots
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.strategy = Strategy::Parallel {
            concurrency: concurrency.max(1),
        };
        self
    }

    /// Set the error policy (defaults to [`AbortOnError`])
    ///
    /// # Example
    /// ```rust,ignore
    /// // Drop items whose checks could not run, keep validating the rest
    /// validator.with_error_policy(SkipErrors)
    /// ```
    pub fn with_error_policy<Q>(self, error_policy: Q) -> StreamValidator<T, S, Q>
    where
        Q: ErrorPolicy + 'static,
    {
        StreamValidator {
            rules: self.rules,
            error_policy,
            strategy: self.strategy,
            stream_combinator: self.stream_combinator,
            streams: self.streams,
        }
    }

    /// Set how to combine multiple sources (defaults to Merge)
    pub fn with_stream_combinator(mut self, combinator: StreamCombinator) -> Self {
        self.stream_combinator = combinator;
        self
    }

    /// Add an infallible source of items
    pub fn add_stream<St>(mut self, stream: St) -> Self
    where
        St: Stream<Item = T> + Send + 'static,
    {
        self.streams.push(Box::pin(stream.map(Ok)));
        self
    }

    /// Add a source whose reads can fail, such as a CSV reader
    pub fn add_source<St>(mut self, stream: St) -> Self
    where
        St: Stream<Item = Result<T, IoError>> + Send + 'static,
    {
        self.streams.push(Box::pin(stream));
        self
    }

    /// The configured strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Combine the sources and validate them lazily
    ///
    /// Every item read from the combined sources is numbered from 1 in
    /// arrival order, and its outcome carries that number. Input errors
    /// the policy rejects end the sources; the outcomes of items already
    /// accepted are still delivered, followed by the error. Execution
    /// failures the policy rejects end the stream at once. Nothing follows
    /// an `Err` item.
    pub fn into_stream(self) -> OutcomeStream {
        let StreamValidator {
            rules,
            error_policy,
            strategy,
            stream_combinator,
            streams,
        } = self;

        debug!(sources = streams.len(), %strategy, ?stream_combinator, "Starting stream validation");

        let combined: SourceStream<T> = match stream_combinator {
            StreamCombinator::Merge => Box::pin(stream::select_all(streams)),
            StreamCombinator::Chain => Box::pin(stream::iter(streams).flatten()),
        };

        let error_policy = Arc::new(error_policy);
        let (io_failure_tx, io_failure_rx) = oneshot::channel::<IoError>();

        // The sender lives in the scan state; `chain` drops the outcome stream
        // once it ends, so the trailing receiver always resolves
        let io_policy = error_policy.clone();
        let items = combined
            .enumerate()
            .scan(Some(io_failure_tx), move |io_failure, (index, result)| {
                future::ready(match result {
                    Ok(item) => Some(Some((index as u64 + 1, item))),
                    Err(error) if io_policy.handle_io_error(&error) => Some(None),
                    Err(error) => {
                        if let Some(tx) = io_failure.take() {
                            let _ = tx.send(error);
                        }
                        None
                    }
                })
            })
            .filter_map(future::ready);

        let invoke = move |(seq, item): (u64, T)| {
            validate_shared(item, Arc::clone(&rules))
                .map(move |result| result.map(|outcome| SequencedOutcome::new(seq, outcome)))
        };

        let widen = |result: Result<SequencedOutcome, EngineError>| result.map_err(PipelineError::from);
        let outcomes: OutcomeStream = match strategy {
            Strategy::Sequential => Box::pin(sequential_invocations(items, invoke).map(widen)),
            Strategy::Latest => Box::pin(
                latest_invocations(items, move |entry| invoke(entry).boxed()).map(widen),
            ),
            Strategy::Parallel { concurrency } => {
                Box::pin(parallel_invocations(items, invoke, concurrency).map(widen))
            }
        };

        let isolated = outcomes.filter_map(move |result| {
            future::ready(match result {
                Err(PipelineError::Engine(error)) if error_policy.handle_engine_error(&error) => None,
                other => Some(other),
            })
        });

        let trailing_io_failure = stream::once(io_failure_rx)
            .filter_map(|received| future::ready(received.ok().map(|error| Err(PipelineError::Io(error)))));

        Box::pin(StopAfterError::new(isolated.chain(trailing_io_failure)))
    }

    /// Validate every source to completion and collect the outcomes
    ///
    /// Holds every outcome in memory; use [`into_stream`](Self::into_stream)
    /// to handle them as they arrive.
    ///
    /// # Example
    /// ```rust,ignore
    /// let report = StreamValidator::new(rules)
    ///     .with_stream_combinator(StreamCombinator::Chain)
    ///     .add_stream(first)
    ///     .add_stream(second)
    ///     .run()
    ///     .await;
    ///
    /// if report.all_valid() {
    ///     println!("Every item passed");
    /// }
    /// ```
    pub async fn run(self) -> ValidationReport {
        let mut outcomes = self.into_stream();
        let mut report = ValidationReport::default();

        while let Some(result) = outcomes.next().await {
            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(error) => {
                    report.aborted = Some(error);
                    break;
                }
            }
        }

        debug!(
            total = report.total(),
            invalid = report.invalid_count(),
            completed = report.completed(),
            "Stream validation finished"
        );
        report
    }
}

/// Outcomes collected by [`StreamValidator::run`], in emission order
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub outcomes: Vec<SequencedOutcome>,
    pub aborted: Option<PipelineError>,
}

impl ValidationReport {
    /// Number of outcomes produced
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    /// True if the pipeline ran to the end of its sources
    pub fn completed(&self) -> bool {
        self.aborted.is_none()
    }

    /// True if the pipeline completed and every outcome is valid
    pub fn all_valid(&self) -> bool {
        self.completed() && self.outcomes.iter().all(|o| o.is_valid())
    }
}
