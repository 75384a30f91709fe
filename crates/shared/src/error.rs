//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Engine errors from `budgetops-core` convert into these kinds; the API layer
/// maps each kind to an HTTP status and a stable error code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input to a single operation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A supplied identifier does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Pole percentages do not sum to 100.
    #[error("Allocation mismatch: {0}")]
    AllocationMismatch(String),

    /// A value lies outside its permitted range.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Mutation of a realized (locked) record.
    #[error("Locked: {0}")]
    Locked(String),

    /// Fiscal year already exists.
    #[error("Duplicate year: {0}")]
    DuplicateYear(String),

    /// Deletion refused because other records still reference the target.
    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(String),

    /// Conflict (e.g., duplicate name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::InvalidReference(_) | Self::OutOfRange(_) => 400,
            Self::AllocationMismatch(_) => 422,
            Self::Locked(_) => 423,
            Self::DuplicateYear(_) | Self::ReferentialIntegrity(_) | Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::AllocationMismatch(_) => "ALLOCATION_MISMATCH",
            Self::OutOfRange(_) => "OUT_OF_RANGE",
            Self::Locked(_) => "LOCKED",
            Self::DuplicateYear(_) => "DUPLICATE_YEAR",
            Self::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller can recover by correcting its request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
