//! Catalog error types.

use budgetops_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::types::CatalogKind;
use crate::integrity::BlockingReferences;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Name already used for this kind.
    #[error("A {kind} named '{name}' already exists")]
    Conflict {
        /// Kind.
        kind: CatalogKind,
        /// Duplicate name.
        name: String,
    },

    /// Entry not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind.
        kind: CatalogKind,
        /// Supplied identifier.
        id: Uuid,
    },

    /// Entry is still referenced.
    #[error("{kind} is referenced by {references}")]
    ReferentialIntegrity {
        /// Kind.
        kind: CatalogKind,
        /// Blocking counts.
        references: BlockingReferences,
    },

    /// Storage failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl CatalogError {
    /// Create a repository error.
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::Validation(msg),
            e @ CatalogError::Conflict { .. } => Self::Conflict(e.to_string()),
            e @ CatalogError::NotFound { .. } => Self::NotFound(e.to_string()),
            e @ CatalogError::ReferentialIntegrity { .. } => {
                Self::ReferentialIntegrity(e.to_string())
            }
            CatalogError::Repository(msg) => Self::Database(msg),
        }
    }
}
