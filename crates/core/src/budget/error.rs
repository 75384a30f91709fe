//! Budget error types.

use budgetops_shared::AppError;
use budgetops_shared::types::{BudgetLineId, EntityKind};
use thiserror::Error;
use uuid::Uuid;

use crate::integrity::BlockingReferences;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget line not found.
    #[error("Budget line not found: {0}")]
    NotFound(BudgetLineId),

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

    /// The line is still referenced and cannot be deleted.
    #[error("Budget line is referenced by {0}")]
    ReferentialIntegrity(BlockingReferences),

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl BudgetError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            e @ BudgetError::NotFound(_) => Self::NotFound(e.to_string()),
            BudgetError::Validation(msg) => Self::Validation(msg),
            e @ BudgetError::InvalidReference { .. } => Self::InvalidReference(e.to_string()),
            e @ BudgetError::ReferentialIntegrity(_) => Self::ReferentialIntegrity(e.to_string()),
            BudgetError::Repository(msg) => Self::Database(msg),
        }
    }
}
