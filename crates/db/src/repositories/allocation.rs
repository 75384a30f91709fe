//! Pole allocation repository.

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use budgetops_core::allocation::{
    AllocationError, AllocationRepository as AllocationRepoTrait, PoleAllocation,
};
use budgetops_core::budget::BudgetLine;
use budgetops_shared::types::{BudgetLineId, PoleId, TenantId};

use super::{convert, lookup};
use crate::entities::{catalog_entries, pole_allocations};
use crate::tenant::TenantTransaction;

/// Pole allocation repository implementation.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    db: DatabaseConnection,
}

impl AllocationRepository {
    /// Create a new allocation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces the set under a lock on the budget line row, so concurrent
    /// replacements of the same line apply one after the other.
    async fn replace(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        allocations: Vec<PoleAllocation>,
    ) -> Result<(), DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        if lookup::budget_line(conn, tenant_id, id, true).await?.is_none() {
            txn.rollback().await?;
            return Err(DbErr::RecordNotFound(format!("budget line {id}")));
        }

        pole_allocations::Entity::delete_many()
            .filter(pole_allocations::Column::BudgetLineId.eq(id.0))
            .exec(conn)
            .await?;

        if !allocations.is_empty() {
            let rows = allocations
                .iter()
                .zip(0_i32..)
                .map(|(allocation, position)| pole_allocations::ActiveModel {
                    budget_line_id: Set(id.0),
                    pole_id: Set(allocation.pole_id.0),
                    tenant_id: Set(tenant_id.0),
                    percentage: Set(allocation.percentage),
                    position: Set(position),
                });
            pole_allocations::Entity::insert_many(rows).exec(conn).await?;
        }

        txn.commit().await
    }
}

fn db_err(err: DbErr) -> AllocationError {
    AllocationError::repository(err.to_string())
}

impl AllocationRepoTrait for AllocationRepository {
    async fn allocation_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Option<BudgetLine>, AllocationError> {
        lookup::budget_line(&self.db, tenant_id, id, false)
            .await
            .map_err(db_err)
    }

    async fn missing_poles(
        &self,
        tenant_id: TenantId,
        poles: Vec<PoleId>,
    ) -> Result<Vec<PoleId>, AllocationError> {
        if poles.is_empty() {
            return Ok(Vec::new());
        }
        let found: HashSet<Uuid> = catalog_entries::Entity::find()
            .select_only()
            .column(catalog_entries::Column::Id)
            .filter(catalog_entries::Column::TenantId.eq(tenant_id.0))
            .filter(catalog_entries::Column::Kind.eq(convert::catalog_kind_to_db(
                budgetops_core::catalog::CatalogKind::Pole,
            )))
            .filter(catalog_entries::Column::Id.is_in(poles.iter().map(|p| p.0)))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();
        Ok(poles.into_iter().filter(|p| !found.contains(&p.0)).collect())
    }

    async fn replace_allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        allocations: Vec<PoleAllocation>,
    ) -> Result<(), AllocationError> {
        let count = allocations.len();
        self.replace(tenant_id, id, allocations).await.map_err(db_err)?;
        tracing::debug!(
            tenant_id = %tenant_id,
            budget_line_id = %id,
            count,
            "pole allocations replaced"
        );
        Ok(())
    }

    async fn allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<PoleAllocation>, AllocationError> {
        let models = pole_allocations::Entity::find()
            .filter(pole_allocations::Column::TenantId.eq(tenant_id.0))
            .filter(pole_allocations::Column::BudgetLineId.eq(id.0))
            .order_by_asc(pole_allocations::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(convert::pole_allocation).collect())
    }
}
