//! Fiscal year error types.

use budgetops_shared::AppError;
use thiserror::Error;

/// Fiscal year errors.
#[derive(Debug, Error)]
pub enum YearError {
    /// Malformed request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The year already holds forecast lines or an envelope.
    #[error("Fiscal year {0} already exists")]
    DuplicateYear(i32),

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl YearError {
    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<YearError> for AppError {
    fn from(err: YearError) -> Self {
        match err {
            YearError::Validation(msg) => Self::Validation(msg),
            e @ YearError::DuplicateYear(_) => Self::DuplicateYear(e.to_string()),
            YearError::Repository(msg) => Self::Database(msg),
        }
    }
}
