use std::sync::Arc;

use futures::Stream;

use super::latest::{LatestValidation, validate_latest};
use super::parallel::validate_parallel;
use super::sequential::validate_sequential;
use super::stop::StopAfterError;
use crate::domain::ValidationOutcome;
use crate::engine::{EngineError, RuleSet};

/// Attach a rule set to any stream with one of the three strategies
///
/// # Example
/// ```rust,ignore
/// use flowguard::prelude::*;
///
/// let outcomes = signups.validate_parallel(Arc::new(SignupRules::default()), 8);
/// ```
pub trait ValidateStreamExt: Stream + Sized {
    /// See [`validate_sequential`]
    fn validate_sequential<S>(
        self,
        rules: Arc<S>,
    ) -> impl Stream<Item = Result<ValidationOutcome, EngineError>>
    where
        Self::Item: Send + 'static,
        S: RuleSet<Self::Item> + ?Sized + 'static,
    {
        validate_sequential(self, rules)
    }

    /// See [`validate_latest`]
    fn validate_latest<S>(self, rules: Arc<S>) -> StopAfterError<LatestValidation<Self>>
    where
        Self::Item: Send + 'static,
        S: RuleSet<Self::Item> + ?Sized + 'static,
    {
        validate_latest(self, rules)
    }

    /// See [`validate_parallel`]
    fn validate_parallel<S>(
        self,
        rules: Arc<S>,
        concurrency: usize,
    ) -> impl Stream<Item = Result<ValidationOutcome, EngineError>>
    where
        Self::Item: Send + 'static,
        S: RuleSet<Self::Item> + ?Sized + 'static,
    {
        validate_parallel(self, rules, concurrency)
    }
}

impl<St: Stream> ValidateStreamExt for St {}
