//! Catalog service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use budgetops_shared::types::TenantId;

use super::error::CatalogError;
use super::types::{CatalogEntry, CatalogKind};
use crate::integrity::GuardedDelete;

/// Repository trait for reference data.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait CatalogRepository: Send + Sync {
    /// Returns true if the name is already used for this kind, ignoring case.
    fn name_taken(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        name: String,
    ) -> impl std::future::Future<Output = Result<bool, CatalogError>> + Send;

    /// Persist an entry.
    fn insert_entry(
        &self,
        entry: CatalogEntry,
    ) -> impl std::future::Future<Output = Result<CatalogEntry, CatalogError>> + Send;

    /// Entries of a kind, ordered by name.
    fn list_entries(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
    ) -> impl std::future::Future<Output = Result<Vec<CatalogEntry>, CatalogError>> + Send;

    /// Delete an entry unless records of [`CatalogKind::blocking_kinds`] reference it.
    fn delete_entry_guarded(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<GuardedDelete, CatalogError>> + Send;
}

/// Catalog service.
pub struct CatalogService<R: CatalogRepository> {
    repo: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create an entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name and `Conflict` for a name
    /// already used by the same kind.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        name: &str,
    ) -> Result<CatalogEntry, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(format!("{kind} name cannot be empty")));
        }
        if self
            .repo
            .name_taken(tenant_id, kind, name.to_string())
            .await?
        {
            tracing::warn!(tenant_id = %tenant_id, %kind, name, "catalog name already used");
            return Err(CatalogError::Conflict {
                kind,
                name: name.to_string(),
            });
        }

        let entry = CatalogEntry {
            id: Uuid::now_v7(),
            tenant_id,
            kind,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let entry = self.repo.insert_entry(entry).await?;
        tracing::info!(tenant_id = %tenant_id, %kind, id = %entry.id, "catalog entry created");
        Ok(entry)
    }

    /// Entries of a kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.repo.list_entries(tenant_id, kind).await
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns `ReferentialIntegrity` with blocking counts while the entry is
    /// referenced and `NotFound` if it does not exist.
    pub async fn delete(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> Result<(), CatalogError> {
        match self.repo.delete_entry_guarded(tenant_id, kind, id).await? {
            GuardedDelete::Deleted => {
                tracing::info!(tenant_id = %tenant_id, %kind, %id, "catalog entry deleted");
                Ok(())
            }
            GuardedDelete::NotFound => Err(CatalogError::NotFound { kind, id }),
            GuardedDelete::Blocked(references) => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    %kind,
                    %id,
                    references = %references,
                    "catalog deletion refused"
                );
                Err(CatalogError::ReferentialIntegrity { kind, references })
            }
        }
    }
}
