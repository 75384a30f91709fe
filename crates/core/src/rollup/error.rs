//! Rollup error types.

use budgetops_shared::AppError;
use chrono::NaiveDate;
use thiserror::Error;

/// Rollup errors.
#[derive(Debug, Error)]
pub enum RollupError {
    /// Malformed widget configuration.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Range start after range end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl RollupError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<RollupError> for AppError {
    fn from(err: RollupError) -> Self {
        match err {
            RollupError::Validation(msg) => Self::Validation(msg),
            e @ RollupError::InvalidDateRange { .. } => Self::Validation(e.to_string()),
            RollupError::Repository(msg) => Self::Database(msg),
        }
    }
}
