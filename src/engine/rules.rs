use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use super::context::ValidationContext;
use super::error::EngineError;
use crate::domain::ValidationOutcome;

/// Rule-declaration routine run once per item
///
/// Implementations declare field scopes and checks against the context.
/// They must declare the same checks for equal items and must not keep
/// the context past the call.
#[async_trait]
pub trait RuleSet<T: Send + 'static>: Send + Sync {
    /// Declare and run every check for the context's item
    async fn declare(&self, ctx: &mut ValidationContext<T>) -> Result<(), EngineError>;
}

#[async_trait]
impl<T, F> RuleSet<T> for F
where
    T: Send + 'static,
    F: for<'c> Fn(&'c mut ValidationContext<T>) -> BoxFuture<'c, Result<(), EngineError>>
        + Send
        + Sync,
{
    async fn declare(&self, ctx: &mut ValidationContext<T>) -> Result<(), EngineError> {
        (self)(ctx).await
    }
}

/// Pin a closure to the signature expected by [`RuleSet`]
///
/// Closures only infer a higher-ranked signature when passed straight to
/// a function that asks for one; this is that function.
///
/// # Example
/// ```rust,ignore
/// let username_rules = rules(|ctx: &mut ValidationContext<String>| Box::pin(async move {
///     ctx.field(|s| s.clone())
///         .check("too short", "min_len", |s| s.len() > 3);
///     Ok(())
/// }));
/// ```
pub fn rules<T, F>(f: F) -> F
where
    T: Send + 'static,
    F: for<'c> Fn(&'c mut ValidationContext<T>) -> BoxFuture<'c, Result<(), EngineError>>
        + Send
        + Sync,
{
    f
}

/// Validate one item: build a fresh context, run the rules, return the outcome
///
/// Execution failures raised by the rules are returned as-is; no outcome
/// is produced for that item.
pub async fn validate<T, S>(item: T, rules: &S) -> Result<ValidationOutcome, EngineError>
where
    T: Send + 'static,
    S: RuleSet<T> + ?Sized,
{
    let mut ctx = ValidationContext::new(item);
    rules.declare(&mut ctx).await?;

    let outcome = ctx.into_outcome();
    debug!(
        valid = outcome.is_valid(),
        errors = outcome.error_count(),
        "Item validated"
    );
    Ok(outcome)
}

/// Owned-argument form of [`validate`] used by the stream strategies
pub(crate) async fn validate_shared<T, S>(
    item: T,
    rules: Arc<S>,
) -> Result<ValidationOutcome, EngineError>
where
    T: Send + 'static,
    S: RuleSet<T> + ?Sized,
{
    validate(item, rules.as_ref()).await
}
