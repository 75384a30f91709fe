//! Fiscal year repository.

use std::collections::BTreeSet;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use budgetops_core::fiscal::{YearError, YearOccupancy, YearRepository as YearRepoTrait, YearWrite};
use budgetops_core::forecast::ForecastBudgetLine;
use budgetops_shared::types::TenantId;

use super::convert;
use crate::entities::{budget_envelopes, forecast_budget_lines, yearly_budgets};
use crate::tenant::TenantTransaction;

/// Advisory lock scope taken while a year is being created.
const YEAR_LOCK_SCOPE: &str = "fiscal_year";

/// Fiscal year repository implementation.
#[derive(Debug, Clone)]
pub struct YearRepository {
    db: DatabaseConnection,
}

impl YearRepository {
    /// Create a new year repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn create_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
        lines: Vec<ForecastBudgetLine>,
    ) -> Result<YearWrite, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        txn.advisory_lock(tenant_id, YEAR_LOCK_SCOPE, i64::from(year))
            .await?;
        let conn = txn.connection();

        if occupancy(conn, tenant_id, year).await?.is_taken() {
            txn.rollback().await?;
            return Ok(YearWrite::Duplicate);
        }

        let created = lines.len();
        if !lines.is_empty() {
            let rows = lines.into_iter().map(|line| forecast_budget_lines::ActiveModel {
                id: Set(line.id.0),
                tenant_id: Set(tenant_id.0),
                label: Set(line.label),
                nature: Set(line.nature.as_str().to_string()),
                budget_type_id: Set(line.budget_type_id.map(|t| t.0)),
                domain_id: Set(line.domain_id.map(|d| d.0)),
                year: Set(year),
                budget: Set(line.budget),
                created_at: Set(line.created_at.into()),
            });
            forecast_budget_lines::Entity::insert_many(rows)
                .exec(conn)
                .await?;
        }

        txn.commit().await?;
        Ok(YearWrite::Created(created))
    }

    async fn years(&self, tenant_id: TenantId) -> Result<Vec<i32>, DbErr> {
        let tenant = tenant_id.0;
        let mut years = BTreeSet::new();
        years.extend(
            forecast_budget_lines::Entity::find()
                .select_only()
                .column(forecast_budget_lines::Column::Year)
                .distinct()
                .filter(forecast_budget_lines::Column::TenantId.eq(tenant))
                .into_tuple::<i32>()
                .all(&self.db)
                .await?,
        );
        years.extend(
            budget_envelopes::Entity::find()
                .select_only()
                .column(budget_envelopes::Column::Year)
                .filter(budget_envelopes::Column::TenantId.eq(tenant))
                .into_tuple::<i32>()
                .all(&self.db)
                .await?,
        );
        years.extend(
            yearly_budgets::Entity::find()
                .select_only()
                .column(yearly_budgets::Column::Year)
                .distinct()
                .filter(yearly_budgets::Column::TenantId.eq(tenant))
                .into_tuple::<i32>()
                .all(&self.db)
                .await?,
        );
        Ok(years.into_iter().collect())
    }
}

async fn occupancy<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    year: i32,
) -> Result<YearOccupancy, DbErr> {
    let forecast_lines = forecast_budget_lines::Entity::find()
        .filter(forecast_budget_lines::Column::TenantId.eq(tenant_id.0))
        .filter(forecast_budget_lines::Column::Year.eq(year))
        .count(conn)
        .await?;
    let has_envelope = budget_envelopes::Entity::find_by_id((tenant_id.0, year))
        .count(conn)
        .await?
        > 0;
    Ok(YearOccupancy {
        forecast_lines,
        has_envelope,
    })
}

fn db_err(err: DbErr) -> YearError {
    YearError::repository(err.to_string())
}

impl YearRepoTrait for YearRepository {
    async fn year_occupancy(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<YearOccupancy, YearError> {
        occupancy(&self.db, tenant_id, year).await.map_err(db_err)
    }

    async fn year_forecast_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastBudgetLine>, YearError> {
        forecast_budget_lines::Entity::find()
            .filter(forecast_budget_lines::Column::TenantId.eq(tenant_id.0))
            .filter(forecast_budget_lines::Column::Year.eq(year))
            .order_by_asc(forecast_budget_lines::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| convert::forecast_line(m).map_err(db_err))
            .collect()
    }

    async fn create_year_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
        lines: Vec<ForecastBudgetLine>,
    ) -> Result<YearWrite, YearError> {
        self.create_lines(tenant_id, year, lines).await.map_err(db_err)
    }

    async fn known_years(&self, tenant_id: TenantId) -> Result<Vec<i32>, YearError> {
        self.years(tenant_id).await.map_err(db_err)
    }
}
