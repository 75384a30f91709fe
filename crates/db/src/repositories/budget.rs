//! Budget line repository.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use budgetops_core::budget::{
    BudgetError, BudgetLine, BudgetLineRepository as BudgetLineRepoTrait, YearlyBudget,
};
use budgetops_core::integrity::{BlockingReferences, GuardedDelete};
use budgetops_core::procurement::{Contract, Invoice};
use budgetops_shared::types::{BudgetLineId, EntityKind, TenantId};

use super::{convert, lookup};
use crate::entities::{budget_lines, contracts, invoices, purchase_orders, yearly_budgets};
use crate::tenant::TenantTransaction;

/// Budget line repository implementation.
#[derive(Debug, Clone)]
pub struct BudgetLineRepository {
    db: DatabaseConnection,
}

impl BudgetLineRepository {
    /// Create a new budget line repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn delete_guarded(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<GuardedDelete, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        if lookup::budget_line(conn, tenant_id, id, true).await?.is_none() {
            txn.rollback().await?;
            return Ok(GuardedDelete::NotFound);
        }

        let mut references = BlockingReferences::new();
        references.add(
            EntityKind::Contract,
            contracts::Entity::find()
                .filter(contracts::Column::BudgetLineId.eq(id.0))
                .count(conn)
                .await?,
        );
        references.add(
            EntityKind::Invoice,
            invoices::Entity::find()
                .filter(invoices::Column::BudgetLineId.eq(id.0))
                .count(conn)
                .await?,
        );
        references.add(
            EntityKind::PurchaseOrder,
            purchase_orders::Entity::find()
                .filter(purchase_orders::Column::BudgetLineId.eq(id.0))
                .count(conn)
                .await?,
        );
        if !references.is_empty() {
            txn.rollback().await?;
            return Ok(GuardedDelete::Blocked(references));
        }

        // Yearly budgets and allocations cascade.
        budget_lines::Entity::delete_by_id(id.0).exec(conn).await?;
        txn.commit().await?;
        Ok(GuardedDelete::Deleted)
    }
}

fn db_err(err: DbErr) -> BudgetError {
    BudgetError::repository(err.to_string())
}

impl BudgetLineRepoTrait for BudgetLineRepository {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, BudgetError> {
        lookup::reference_exists(&self.db, tenant_id, kind, id)
            .await
            .map_err(db_err)
    }

    async fn insert_line(&self, line: BudgetLine) -> Result<BudgetLine, BudgetError> {
        budget_lines::ActiveModel {
            id: Set(line.id.0),
            tenant_id: Set(line.tenant_id.0),
            label: Set(line.label.clone()),
            nature: Set(line.nature.as_str().to_string()),
            budget_type_id: Set(line.budget_type_id.map(|t| t.0)),
            domain_id: Set(line.domain_id.map(|d| d.0)),
            accounting_code: Set(line.accounting_code.clone()),
            pole_id: Set(line.pole_id.map(|p| p.0)),
            created_at: Set(line.created_at.into()),
            updated_at: Set(line.updated_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(line)
    }

    async fn find_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Option<BudgetLine>, BudgetError> {
        lookup::budget_line(&self.db, tenant_id, id, false)
            .await
            .map_err(db_err)
    }

    async fn list_lines(&self, tenant_id: TenantId) -> Result<Vec<BudgetLine>, BudgetError> {
        budget_lines::Entity::find()
            .filter(budget_lines::Column::TenantId.eq(tenant_id.0))
            .order_by_asc(budget_lines::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| convert::budget_line(m).map_err(db_err))
            .collect()
    }

    async fn upsert_yearly_budget(
        &self,
        tenant_id: TenantId,
        budget: YearlyBudget,
    ) -> Result<YearlyBudget, BudgetError> {
        let model = yearly_budgets::ActiveModel {
            budget_line_id: Set(budget.budget_line_id.0),
            year: Set(budget.year),
            tenant_id: Set(tenant_id.0),
            amount: Set(budget.amount),
        };
        yearly_budgets::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    yearly_budgets::Column::BudgetLineId,
                    yearly_budgets::Column::Year,
                ])
                .update_column(yearly_budgets::Column::Amount)
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(budget)
    }

    async fn yearly_budgets(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<YearlyBudget>, BudgetError> {
        let models = yearly_budgets::Entity::find()
            .filter(yearly_budgets::Column::TenantId.eq(tenant_id.0))
            .filter(yearly_budgets::Column::BudgetLineId.eq(id.0))
            .order_by_desc(yearly_budgets::Column::Year)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(convert::yearly_budget).collect())
    }

    async fn linked_contracts(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<Contract>, BudgetError> {
        lookup::contracts(&self.db, tenant_id, Some(id))
            .await
            .map_err(db_err)
    }

    async fn linked_invoices(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<Invoice>, BudgetError> {
        lookup::invoices(&self.db, tenant_id, Some(id))
            .await
            .map_err(db_err)
    }

    async fn delete_line_guarded(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<GuardedDelete, BudgetError> {
        let outcome = self.delete_guarded(tenant_id, id).await.map_err(db_err)?;
        tracing::debug!(
            tenant_id = %tenant_id,
            budget_line_id = %id,
            ?outcome,
            "guarded budget line delete"
        );
        Ok(outcome)
    }
}
