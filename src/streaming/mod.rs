pub mod error;
pub mod ext;
pub mod latest;
pub mod parallel;
pub mod processor;
pub mod sequential;
pub mod stop;
pub mod strategy;

// Re-export commonly used types
pub use error::{AbortOnError, ErrorPolicy, PipelineError, SilentSkip, SkipErrors, StrategyError};
pub use ext::ValidateStreamExt;
pub use latest::{LatestValidation, validate_latest};
pub use parallel::{DEFAULT_CONCURRENCY, validate_parallel};
pub use processor::{OutcomeStream, StreamCombinator, StreamValidator, ValidationReport};
pub use sequential::validate_sequential;
pub use stop::StopAfterError;
pub use strategy::Strategy;
