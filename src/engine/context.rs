use std::future::Future;

use futures::future::BoxFuture;
use tracing::debug;

use super::error::{BoxError, EngineError};
use crate::domain::{ValidationError, ValidationOutcome};

/// Execution frame for validating exactly one item
///
/// Owns the item under validation and the outcome being built. A fresh
/// context is created per invocation and never shared, so concurrent
/// invocations need no synchronisation.
pub struct ValidationContext<T> {
    root: T,
    outcome: ValidationOutcome,
}

impl<T> ValidationContext<T> {
    pub(crate) fn new(root: T) -> Self {
        Self {
            root,
            outcome: ValidationOutcome::new(),
        }
    }

    /// The item under validation
    pub fn root(&self) -> &T {
        &self.root
    }

    /// Outcome built so far
    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    /// Open a field scope over the value produced by `extractor`
    ///
    /// Checks made on the returned scope append to this context's outcome.
    /// The scope borrows the context mutably, so field scopes can only run
    /// one after another.
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut name = ctx.field(|user: &User| user.name.clone());
    /// name.check("name is required", "required", |n| !n.is_empty());
    /// name.check_async("name is taken", "taken", |n| directory.is_free(n)).await;
    /// ```
    pub fn field<R, X>(&mut self, extractor: X) -> FieldContext<'_, R>
    where
        X: FnOnce(&T) -> R,
    {
        let value = extractor(&self.root);
        FieldContext {
            value,
            outcome: &mut self.outcome,
        }
    }

    /// Run `block` against the value produced by `extractor`
    ///
    /// The block completes, including every suspending check inside it,
    /// before this future resolves. Execution failures raised inside the
    /// block are returned unchanged.
    ///
    /// # Example
    /// ```rust,ignore
    /// ctx.validate_field(|user: &User| user.email.clone(), |email| Box::pin(async move {
    ///     email.check("email needs an @", "email.format", |e| e.contains('@'));
    ///     email.try_check_async("email bounced", "email.bounce", |e| mx.verify(e)).await?;
    ///     Ok(())
    /// })).await?;
    /// ```
    pub async fn validate_field<R, X, B>(&mut self, extractor: X, block: B) -> Result<(), EngineError>
    where
        X: FnOnce(&T) -> R,
        B: for<'f> FnOnce(&'f mut FieldContext<'_, R>) -> BoxFuture<'f, Result<(), EngineError>>,
    {
        let mut field = self.field(extractor);
        block(&mut field).await
    }

    pub(crate) fn into_outcome(self) -> ValidationOutcome {
        self.outcome
    }
}

/// Scope wrapping one extracted field value
///
/// Holds the value and a back-reference to the owning outcome; it only
/// ever appends errors to it.
pub struct FieldContext<'a, R> {
    value: R,
    outcome: &'a mut ValidationOutcome,
}

impl<'a, R> FieldContext<'a, R> {
    /// The extracted field value
    pub fn value(&self) -> &R {
        &self.value
    }

    /// Evaluate a synchronous predicate, recording an error if it fails
    ///
    /// Never short-circuits: later checks run whatever this one returns.
    pub fn check<'m, P>(
        &mut self,
        message: &'m str,
        code: impl Into<Option<&'m str>>,
        predicate: P,
    ) -> &mut Self
    where
        P: FnOnce(&R) -> bool,
    {
        let passed = predicate(&self.value);
        self.record(passed, message, code.into());
        self
    }

    /// Evaluate a predicate that may suspend, recording an error if it fails
    ///
    /// The predicate receives a clone of the field value so the returned
    /// future can own it.
    pub async fn check_async<'m, P, Fut>(
        &mut self,
        message: &'m str,
        code: impl Into<Option<&'m str>>,
        predicate: P,
    ) where
        R: Clone,
        P: FnOnce(R) -> Fut,
        Fut: Future<Output = bool>,
    {
        let code = code.into();
        let passed = predicate(self.value.clone()).await;
        self.record(passed, message, code);
    }

    /// Like [`check`](Self::check), for predicates that can fail to evaluate
    ///
    /// `Ok(false)` is recorded as a validation error; `Err(_)` is returned
    /// as [`EngineError::PredicateFailed`] and nothing is recorded.
    pub fn try_check<'m, P, E>(
        &mut self,
        message: &'m str,
        code: impl Into<Option<&'m str>>,
        predicate: P,
    ) -> Result<&mut Self, EngineError>
    where
        P: FnOnce(&R) -> Result<bool, E>,
        E: Into<BoxError>,
    {
        let passed = predicate(&self.value).map_err(|e| EngineError::predicate(message, e))?;
        self.record(passed, message, code.into());
        Ok(self)
    }

    /// Like [`check_async`](Self::check_async), for predicates that can fail
    /// to evaluate
    pub async fn try_check_async<'m, P, Fut, E>(
        &mut self,
        message: &'m str,
        code: impl Into<Option<&'m str>>,
        predicate: P,
    ) -> Result<(), EngineError>
    where
        R: Clone,
        P: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: Into<BoxError>,
    {
        let code = code.into();
        let passed = predicate(self.value.clone())
            .await
            .map_err(|e| EngineError::predicate(message, e))?;
        self.record(passed, message, code);
        Ok(())
    }

    fn record(&mut self, passed: bool, message: &str, code: Option<&str>) {
        if !passed {
            debug!(check = message, code, "Check failed");
            self.outcome
                .record(ValidationError::from_parts(message, code));
        }
    }
}
