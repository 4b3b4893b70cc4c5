use thiserror::Error;
use tracing::warn;

use crate::engine::EngineError;
use crate::io::IoError;

/// Errors raised when configuring a validation pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown validation strategy: {0}")]
    Unknown(String),

    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),
}

/// Failure that ended a validation pipeline early
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Io(#[from] IoError),

    #[error("Validation error: {0}")]
    Engine(#[from] EngineError),
}

/// Policy for handling errors during stream validation
///
/// The default for every pipeline is [`AbortOnError`]: the error is
/// handed downstream and the stream ends. The other policies isolate
/// items from each other by dropping the failed one.
pub trait ErrorPolicy: Send + Sync {
    /// Handle an IO error (CSV decoding, reading)
    /// Return true to continue processing, false to abort
    fn handle_io_error(&self, error: &IoError) -> bool;

    /// Handle an execution failure raised while validating an item
    /// Return true to continue processing, false to abort
    fn handle_engine_error(&self, error: &EngineError) -> bool;
}

/// Skip errors and continue processing (log a warning)
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_io_error(&self, error: &IoError) -> bool {
        warn!(%error, "IO error (skipping)");
        true
    }

    fn handle_engine_error(&self, error: &EngineError) -> bool {
        warn!(%error, "Validation failed to execute (skipping item)");
        true
    }
}

/// Abort on first error
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_io_error(&self, error: &IoError) -> bool {
        warn!(%error, "IO error (aborting)");
        false
    }

    fn handle_engine_error(&self, error: &EngineError) -> bool {
        warn!(%error, "Validation failed to execute (aborting)");
        false
    }
}

/// Silent error policy - skip errors without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_io_error(&self, _error: &IoError) -> bool {
        true
    }

    fn handle_engine_error(&self, _error: &EngineError) -> bool {
        true
    }
}
