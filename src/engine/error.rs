use thiserror::Error;

/// Boxed source error raised by a predicate that could not be evaluated
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Execution failures raised while running rules against an item
///
/// These are distinct from validation failures: a predicate returning
/// `false` is recorded in the outcome, a predicate returning `Err` ends
/// up here and is propagated to the caller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Check '{check}' could not be evaluated: {source}")]
    PredicateFailed {
        check: String,
        #[source]
        source: BoxError,
    },

    #[error("Rule declaration failed: {0}")]
    Rules(String),
}

impl EngineError {
    /// Wrap a predicate failure for the check with the given message
    pub fn predicate(check: &str, source: impl Into<BoxError>) -> Self {
        Self::PredicateFailed {
            check: check.to_string(),
            source: source.into(),
        }
    }
}
