use std::io;
use thiserror::Error;

use crate::io::IoError;
use crate::streaming::{PipelineError, StrategyError};

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV IO error: {0}")]
    CsvIo(#[from] IoError),

    #[error("Validation aborted: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
