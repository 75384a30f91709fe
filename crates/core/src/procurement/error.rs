//! Procurement error types.

use budgetops_shared::AppError;
use budgetops_shared::types::EntityKind;
use thiserror::Error;
use uuid::Uuid;

/// Procurement-related errors.
#[derive(Debug, Error)]
pub enum ProcurementError {
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

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ProcurementError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ProcurementError> for AppError {
    fn from(err: ProcurementError) -> Self {
        match err {
            ProcurementError::Validation(msg) => Self::Validation(msg),
            e @ ProcurementError::InvalidReference { .. } => Self::InvalidReference(e.to_string()),
            ProcurementError::Repository(msg) => Self::Database(msg),
        }
    }
}
