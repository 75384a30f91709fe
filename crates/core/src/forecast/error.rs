//! Forecast error types.

use budgetops_shared::AppError;
use budgetops_shared::types::{EntityKind, ForecastExpenseId};
use thiserror::Error;
use uuid::Uuid;

use crate::integrity::BlockingReferences;

/// Forecast-related errors.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    InvalidReference {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Supplied identifier.
        id: Uuid,
    },

    /// The target record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Supplied identifier.
        id: Uuid,
    },

    /// The expense is realized and cannot be edited or deleted.
    #[error("Forecast expense {0} is realized and locked")]
    Locked(ForecastExpenseId),

    /// The forecast line still owns expenses.
    #[error("Forecast line is referenced by {0}")]
    ReferentialIntegrity(BlockingReferences),

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ForecastError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Missing forecast expense.
    #[must_use]
    pub fn expense_not_found(id: ForecastExpenseId) -> Self {
        Self::NotFound {
            kind: EntityKind::ForecastExpense,
            id: id.0,
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Validation(msg) => Self::Validation(msg),
            e @ ForecastError::InvalidReference { .. } => Self::InvalidReference(e.to_string()),
            e @ ForecastError::NotFound { .. } => Self::NotFound(e.to_string()),
            e @ ForecastError::Locked(_) => Self::Locked(e.to_string()),
            e @ ForecastError::ReferentialIntegrity(_) => Self::ReferentialIntegrity(e.to_string()),
            ForecastError::Repository(msg) => Self::Database(msg),
        }
    }
}
