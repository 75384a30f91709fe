//! Snapshot loader for rollups.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use budgetops_core::allocation::PoleAllocation;
use budgetops_core::rollup::{DataSource, RollupError, RollupSource, TenantSnapshot};
use budgetops_shared::types::{BudgetLineId, TenantId};

use super::{convert, lookup};
use crate::entities::{budget_lines, catalog_entries, pole_allocations, yearly_budgets};

/// Loads tenant snapshots for the rollup pipeline.
#[derive(Debug, Clone)]
pub struct RollupRepository {
    db: DatabaseConnection,
}

impl RollupRepository {
    /// Create a new rollup repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, tenant_id: TenantId, source: DataSource) -> Result<TenantSnapshot, DbErr> {
        let tenant = tenant_id.0;

        let budget_lines = budget_lines::Entity::find()
            .filter(budget_lines::Column::TenantId.eq(tenant))
            .order_by_asc(budget_lines::Column::Label)
            .all(&self.db)
            .await?
            .into_iter()
            .map(convert::budget_line)
            .collect::<Result<Vec<_>, _>>()?;

        let mut allocations: HashMap<BudgetLineId, Vec<PoleAllocation>> = HashMap::new();
        for model in pole_allocations::Entity::find()
            .filter(pole_allocations::Column::TenantId.eq(tenant))
            .order_by_asc(pole_allocations::Column::BudgetLineId)
            .order_by_asc(pole_allocations::Column::Position)
            .all(&self.db)
            .await?
        {
            allocations
                .entry(BudgetLineId(model.budget_line_id))
                .or_default()
                .push(convert::pole_allocation(model));
        }

        let names = catalog_entries::Entity::find()
            .filter(catalog_entries::Column::TenantId.eq(tenant))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|entry| (entry.id, entry.name))
            .collect();

        // Budget line records derive engaged and invoiced from both document kinds.
        let needs_contracts = matches!(source, DataSource::BudgetLines | DataSource::Contracts);
        let needs_invoices = matches!(source, DataSource::BudgetLines | DataSource::Invoices);

        let yearly_budgets = if source == DataSource::BudgetLines {
            yearly_budgets::Entity::find()
                .filter(yearly_budgets::Column::TenantId.eq(tenant))
                .order_by_asc(yearly_budgets::Column::Year)
                .all(&self.db)
                .await?
                .into_iter()
                .map(convert::yearly_budget)
                .collect()
        } else {
            Vec::new()
        };
        let contracts = if needs_contracts {
            lookup::contracts(&self.db, tenant_id, None).await?
        } else {
            Vec::new()
        };
        let invoices = if needs_invoices {
            lookup::invoices(&self.db, tenant_id, None).await?
        } else {
            Vec::new()
        };

        Ok(TenantSnapshot {
            budget_lines,
            yearly_budgets,
            allocations,
            contracts,
            invoices,
            names,
        })
    }
}

impl RollupSource for RollupRepository {
    async fn snapshot(
        &self,
        tenant_id: TenantId,
        source: DataSource,
    ) -> Result<TenantSnapshot, RollupError> {
        self.load(tenant_id, source)
            .await
            .map_err(|err| RollupError::repository(err.to_string()))
    }
}
