//! Prelude module for convenient imports
//!
//! Import everything you need with: `use flowguard::prelude::*;`

// Domain types
pub use crate::domain::{SequencedOutcome, ValidationError, ValidationOutcome};

// Engine types
pub use crate::engine::{
    BoxError, EngineError, FieldContext, RuleSet, ValidationContext, rules, validate,
};

// IO types
pub use crate::io::{CsvRecordStream, IoError, ReportWriter, write_report};

// Streaming types
pub use crate::streaming::{
    AbortOnError, DEFAULT_CONCURRENCY, ErrorPolicy, OutcomeStream, PipelineError, SilentSkip,
    SkipErrors, Strategy, StrategyError, StreamCombinator, StreamValidator, ValidateStreamExt,
    ValidationReport, validate_latest, validate_parallel, validate_sequential,
};

// App types
pub use crate::app::{
    AppError, CliApp, RunStatus, SignupRecord, SignupRules, UsernameDirectory, Writers,
    init_tracing,
};
