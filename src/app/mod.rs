pub mod cli;
pub mod error;
pub mod signup;

// Re-export commonly used types
pub use cli::{CliApp, RunStatus, Writers, init_tracing};
pub use error::AppError;
pub use signup::{SignupRecord, SignupRules, UsernameDirectory};
