pub mod context;
pub mod error;
pub mod rules;

// Re-export commonly used types
pub use context::{FieldContext, ValidationContext};
pub use error::{BoxError, EngineError};
pub use rules::{RuleSet, rules, validate};
pub(crate) use rules::validate_shared;
