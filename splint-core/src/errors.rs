use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading weights and applying transforms.
#[derive(Error, Debug)]
pub enum SplintError {
    #[error("Could not access {path}: {reason}")]
    FileAccess { path: PathBuf, reason: String },
    #[error("Invalid weight dataset: {0}")]
    Schema(String),
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid dimension specification: {0}")]
    InvalidDimensions(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SplintError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SplintError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type for `Result<T, SplintError>`.
pub type SplintResult<T> = Result<T, SplintError>;
