//! Catalog repository for poles, domains, budget types and vendors.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use budgetops_core::catalog::{
    CatalogEntry, CatalogError, CatalogKind, CatalogRepository as CatalogRepoTrait,
};
use budgetops_core::integrity::GuardedDelete;
use budgetops_shared::types::TenantId;

use super::{convert, lookup};
use crate::entities::catalog_entries;
use crate::tenant::TenantTransaction;

/// Catalog repository implementation.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn delete_guarded(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> Result<GuardedDelete, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        let entry = catalog_entries::Entity::find_by_id(id)
            .filter(catalog_entries::Column::TenantId.eq(tenant_id.0))
            .filter(catalog_entries::Column::Kind.eq(convert::catalog_kind_to_db(kind)))
            .lock_exclusive()
            .one(conn)
            .await?;
        if entry.is_none() {
            txn.rollback().await?;
            return Ok(GuardedDelete::NotFound);
        }

        let references = lookup::catalog_references(conn, tenant_id, kind, id).await?;
        if !references.is_empty() {
            txn.rollback().await?;
            return Ok(GuardedDelete::Blocked(references));
        }

        catalog_entries::Entity::delete_by_id(id).exec(conn).await?;
        txn.commit().await?;
        Ok(GuardedDelete::Deleted)
    }
}

fn db_err(err: DbErr) -> CatalogError {
    CatalogError::repository(err.to_string())
}

impl CatalogRepoTrait for CatalogRepository {
    async fn name_taken(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        name: String,
    ) -> Result<bool, CatalogError> {
        let count = catalog_entries::Entity::find()
            .filter(catalog_entries::Column::TenantId.eq(tenant_id.0))
            .filter(catalog_entries::Column::Kind.eq(convert::catalog_kind_to_db(kind)))
            .filter(
                Expr::expr(Func::lower(Expr::col(catalog_entries::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert_entry(&self, entry: CatalogEntry) -> Result<CatalogEntry, CatalogError> {
        catalog_entries::ActiveModel {
            id: Set(entry.id),
            tenant_id: Set(entry.tenant_id.0),
            kind: Set(convert::catalog_kind_to_db(entry.kind).to_string()),
            name: Set(entry.name.clone()),
            created_at: Set(entry.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(entry)
    }

    async fn list_entries(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        catalog_entries::Entity::find()
            .filter(catalog_entries::Column::TenantId.eq(tenant_id.0))
            .filter(catalog_entries::Column::Kind.eq(convert::catalog_kind_to_db(kind)))
            .order_by_asc(catalog_entries::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| convert::catalog_entry(m).map_err(db_err))
            .collect()
    }

    async fn delete_entry_guarded(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> Result<GuardedDelete, CatalogError> {
        self.delete_guarded(tenant_id, kind, id).await.map_err(db_err)
    }
}
