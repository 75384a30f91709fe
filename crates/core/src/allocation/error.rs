//! Allocation error types.

use budgetops_shared::AppError;
use budgetops_shared::types::{EntityKind, PoleId};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Allocation-related errors.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Malformed allocation set.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The budget line or a pole does not exist.
    #[error("{kind} not found: {id}")]
    InvalidReference {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Supplied identifier.
        id: Uuid,
    },

    /// A percentage is outside `[0, 100]`.
    #[error("Percentage {percentage} for pole {pole_id} is outside [0, 100]")]
    OutOfRange {
        /// Offending pole.
        pole_id: PoleId,
        /// Offending percentage.
        percentage: Decimal,
    },

    /// Percentages do not sum to 100.
    #[error("Allocations sum to {actual}, expected 100")]
    AllocationMismatch {
        /// Actual sum.
        actual: Decimal,
    },

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl AllocationError {
    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Validation(msg) => Self::Validation(msg),
            e @ AllocationError::InvalidReference { .. } => Self::InvalidReference(e.to_string()),
            e @ AllocationError::OutOfRange { .. } => Self::OutOfRange(e.to_string()),
            e @ AllocationError::AllocationMismatch { .. } => {
                Self::AllocationMismatch(e.to_string())
            }
            AllocationError::Repository(msg) => Self::Database(msg),
        }
    }
}
