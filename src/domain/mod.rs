pub mod error;
pub mod outcome;

// Re-export commonly used types
pub use error::ValidationError;
pub use outcome::{SequencedOutcome, ValidationOutcome};
