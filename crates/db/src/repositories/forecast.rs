//! Forecast line, expense and envelope repository.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use budgetops_core::forecast::{
    AnnualBudgetEnvelope, ExpensePatch, ExpenseWrite, ForecastBudgetLine, ForecastError,
    ForecastExpense, ForecastRepository as ForecastRepoTrait,
};
use budgetops_core::integrity::{BlockingReferences, GuardedDelete};
use budgetops_shared::types::{
    EntityKind, ForecastBudgetLineId, ForecastExpenseId, InvoiceId, PurchaseOrderId, TenantId,
};

use super::{convert, lookup};
use crate::entities::{
    budget_envelopes, forecast_budget_lines, forecast_expense_invoices,
    forecast_expense_purchase_orders, forecast_expenses, invoices, purchase_orders,
};
use crate::tenant::TenantTransaction;

/// Forecast repository implementation.
#[derive(Debug, Clone)]
pub struct ForecastRepository {
    db: DatabaseConnection,
}

impl ForecastRepository {
    /// Create a new forecast repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn delete_line_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<GuardedDelete, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        let line = forecast_budget_lines::Entity::find_by_id(id.0)
            .filter(forecast_budget_lines::Column::TenantId.eq(tenant_id.0))
            .lock_exclusive()
            .one(conn)
            .await?;
        if line.is_none() {
            txn.rollback().await?;
            return Ok(GuardedDelete::NotFound);
        }

        let mut references = BlockingReferences::new();
        references.add(
            EntityKind::ForecastExpense,
            forecast_expenses::Entity::find()
                .filter(forecast_expenses::Column::ForecastLineId.eq(id.0))
                .count(conn)
                .await?,
        );
        if !references.is_empty() {
            txn.rollback().await?;
            return Ok(GuardedDelete::Blocked(references));
        }

        forecast_budget_lines::Entity::delete_by_id(id.0).exec(conn).await?;
        txn.commit().await?;
        Ok(GuardedDelete::Deleted)
    }

    async fn update_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        patch: ExpensePatch,
    ) -> Result<ExpenseWrite<ForecastExpense>, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        let Some(mut expense) = locked_expense(conn, tenant_id, id).await? else {
            txn.rollback().await?;
            return Ok(ExpenseWrite::NotFound);
        };
        if expense.is_realized() {
            txn.rollback().await?;
            return Ok(ExpenseWrite::Locked);
        }

        expense.apply(&patch);
        forecast_expenses::ActiveModel {
            id: Set(expense.id.0),
            forecast_line_id: Set(expense.forecast_line_id.0),
            label: Set(expense.label.clone()),
            description: Set(expense.description.clone()),
            amount: Set(expense.amount),
            year: Set(expense.year),
            updated_at: Set(expense.updated_at.into()),
            ..Default::default()
        }
        .update(conn)
        .await?;

        txn.commit().await?;
        Ok(ExpenseWrite::Applied(expense))
    }

    async fn delete_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<ExpenseWrite<()>, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        let Some(expense) = locked_expense(conn, tenant_id, id).await? else {
            txn.rollback().await?;
            return Ok(ExpenseWrite::NotFound);
        };
        if expense.is_realized() {
            txn.rollback().await?;
            return Ok(ExpenseWrite::Locked);
        }

        forecast_expense_purchase_orders::Entity::delete_many()
            .filter(forecast_expense_purchase_orders::Column::ExpenseId.eq(id.0))
            .exec(conn)
            .await?;
        forecast_expenses::Entity::delete_by_id(id.0).exec(conn).await?;

        txn.commit().await?;
        Ok(ExpenseWrite::Applied(()))
    }

    async fn link(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        target: Link,
    ) -> Result<Option<ForecastExpense>, DbErr> {
        let txn = TenantTransaction::begin(&self.db, tenant_id).await?;
        let conn = txn.connection();

        let Some(mut expense) = locked_expense(conn, tenant_id, id).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        match target {
            Link::PurchaseOrder(order_id) => {
                if expense.purchase_order_ids.insert(order_id) {
                    forecast_expense_purchase_orders::ActiveModel {
                        expense_id: Set(id.0),
                        purchase_order_id: Set(order_id.0),
                    }
                    .insert(conn)
                    .await?;
                }
            }
            Link::Invoice(invoice_id) => {
                if expense.invoice_ids.insert(invoice_id) {
                    forecast_expense_invoices::ActiveModel {
                        expense_id: Set(id.0),
                        invoice_id: Set(invoice_id.0),
                    }
                    .insert(conn)
                    .await?;
                }
            }
        }

        txn.commit().await?;
        Ok(Some(expense))
    }

    async fn expenses_where(
        &self,
        tenant_id: TenantId,
        filter: sea_orm::Condition,
    ) -> Result<Vec<ForecastExpense>, DbErr> {
        let models = forecast_expenses::Entity::find()
            .filter(forecast_expenses::Column::TenantId.eq(tenant_id.0))
            .filter(filter)
            .order_by_asc(forecast_expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        with_links(&self.db, models).await
    }
}

enum Link {
    PurchaseOrder(PurchaseOrderId),
    Invoice(InvoiceId),
}

/// Loads an expense with its links, locking its row.
async fn locked_expense<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    id: ForecastExpenseId,
) -> Result<Option<ForecastExpense>, DbErr> {
    let Some(model) = forecast_expenses::Entity::find_by_id(id.0)
        .filter(forecast_expenses::Column::TenantId.eq(tenant_id.0))
        .lock_exclusive()
        .one(conn)
        .await?
    else {
        return Ok(None);
    };
    Ok(with_links(conn, vec![model]).await?.pop())
}

/// Converts expense rows and fills their link sets with two queries.
async fn with_links<C: ConnectionTrait>(
    conn: &C,
    models: Vec<forecast_expenses::Model>,
) -> Result<Vec<ForecastExpense>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let order_links = forecast_expense_purchase_orders::Entity::find()
        .filter(forecast_expense_purchase_orders::Column::ExpenseId.is_in(ids.clone()))
        .all(conn)
        .await?;
    let invoice_links = forecast_expense_invoices::Entity::find()
        .filter(forecast_expense_invoices::Column::ExpenseId.is_in(ids))
        .all(conn)
        .await?;

    let mut expenses: Vec<ForecastExpense> =
        models.into_iter().map(convert::forecast_expense).collect();
    let index: HashMap<Uuid, usize> = expenses
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.0, i))
        .collect();

    for link in order_links {
        if let Some(&i) = index.get(&link.expense_id) {
            expenses[i]
                .purchase_order_ids
                .insert(PurchaseOrderId(link.purchase_order_id));
        }
    }
    for link in invoice_links {
        if let Some(&i) = index.get(&link.expense_id) {
            expenses[i].invoice_ids.insert(InvoiceId(link.invoice_id));
        }
    }
    Ok(expenses)
}

fn db_err(err: DbErr) -> ForecastError {
    ForecastError::repository(err.to_string())
}

impl ForecastRepoTrait for ForecastRepository {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, ForecastError> {
        lookup::reference_exists(&self.db, tenant_id, kind, id)
            .await
            .map_err(db_err)
    }

    async fn insert_forecast_line(
        &self,
        line: ForecastBudgetLine,
    ) -> Result<ForecastBudgetLine, ForecastError> {
        forecast_budget_lines::ActiveModel {
            id: Set(line.id.0),
            tenant_id: Set(line.tenant_id.0),
            label: Set(line.label.clone()),
            nature: Set(line.nature.as_str().to_string()),
            budget_type_id: Set(line.budget_type_id.map(|t| t.0)),
            domain_id: Set(line.domain_id.map(|d| d.0)),
            year: Set(line.year),
            budget: Set(line.budget),
            created_at: Set(line.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(line)
    }

    async fn find_forecast_line(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<Option<ForecastBudgetLine>, ForecastError> {
        forecast_budget_lines::Entity::find_by_id(id.0)
            .filter(forecast_budget_lines::Column::TenantId.eq(tenant_id.0))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(convert::forecast_line)
            .transpose()
            .map_err(db_err)
    }

    async fn forecast_lines_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastBudgetLine>, ForecastError> {
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

    async fn delete_forecast_line_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<GuardedDelete, ForecastError> {
        let outcome = self.delete_line_guarded(tenant_id, id).await.map_err(db_err)?;
        tracing::debug!(
            tenant_id = %tenant_id,
            forecast_line_id = %id,
            ?outcome,
            "guarded forecast line delete"
        );
        Ok(outcome)
    }

    async fn insert_expense(
        &self,
        expense: ForecastExpense,
    ) -> Result<ForecastExpense, ForecastError> {
        forecast_expenses::ActiveModel {
            id: Set(expense.id.0),
            tenant_id: Set(expense.tenant_id.0),
            forecast_line_id: Set(expense.forecast_line_id.0),
            label: Set(expense.label.clone()),
            description: Set(expense.description.clone()),
            amount: Set(expense.amount),
            year: Set(expense.year),
            created_at: Set(expense.created_at.into()),
            updated_at: Set(expense.updated_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(expense)
    }

    async fn find_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        let found = self
            .expenses_where(
                tenant_id,
                sea_orm::Condition::all().add(forecast_expenses::Column::Id.eq(id.0)),
            )
            .await
            .map_err(db_err)?;
        Ok(found.into_iter().next())
    }

    async fn expenses_for_line(
        &self,
        tenant_id: TenantId,
        line_id: ForecastBudgetLineId,
    ) -> Result<Vec<ForecastExpense>, ForecastError> {
        self.expenses_where(
            tenant_id,
            sea_orm::Condition::all().add(forecast_expenses::Column::ForecastLineId.eq(line_id.0)),
        )
        .await
        .map_err(db_err)
    }

    async fn expenses_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastExpense>, ForecastError> {
        self.expenses_where(
            tenant_id,
            sea_orm::Condition::all().add(forecast_expenses::Column::Year.eq(year)),
        )
        .await
        .map_err(db_err)
    }

    async fn update_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        patch: ExpensePatch,
    ) -> Result<ExpenseWrite<ForecastExpense>, ForecastError> {
        self.update_guarded(tenant_id, id, patch).await.map_err(db_err)
    }

    async fn delete_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<ExpenseWrite<()>, ForecastError> {
        let outcome = self.delete_guarded(tenant_id, id).await.map_err(db_err)?;
        tracing::debug!(
            tenant_id = %tenant_id,
            expense_id = %id,
            ?outcome,
            "guarded expense delete"
        );
        Ok(outcome)
    }

    async fn link_purchase_order(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        order_id: PurchaseOrderId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        self.link(tenant_id, id, Link::PurchaseOrder(order_id))
            .await
            .map_err(db_err)
    }

    async fn link_invoice(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        invoice_id: InvoiceId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        self.link(tenant_id, id, Link::Invoice(invoice_id))
            .await
            .map_err(db_err)
    }

    async fn purchase_order_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<PurchaseOrderId>,
    ) -> Result<HashMap<PurchaseOrderId, Decimal>, ForecastError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = purchase_orders::Entity::find()
            .select_only()
            .column(purchase_orders::Column::Id)
            .column(purchase_orders::Column::Amount)
            .filter(purchase_orders::Column::TenantId.eq(tenant_id.0))
            .filter(purchase_orders::Column::Id.is_in(ids.into_iter().map(|id| id.0)))
            .into_tuple::<(Uuid, Decimal)>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, amount)| (PurchaseOrderId(id), amount))
            .collect())
    }

    async fn invoice_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<InvoiceId>,
    ) -> Result<HashMap<InvoiceId, Decimal>, ForecastError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Id)
            .column(invoices::Column::Amount)
            .filter(invoices::Column::TenantId.eq(tenant_id.0))
            .filter(invoices::Column::Id.is_in(ids.into_iter().map(|id| id.0)))
            .into_tuple::<(Uuid, Decimal)>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, amount)| (InvoiceId(id), amount))
            .collect())
    }

    async fn upsert_envelope(
        &self,
        envelope: AnnualBudgetEnvelope,
    ) -> Result<AnnualBudgetEnvelope, ForecastError> {
        let model = budget_envelopes::ActiveModel {
            tenant_id: Set(envelope.tenant_id.0),
            year: Set(envelope.year),
            functioning: Set(envelope.functioning),
            investment: Set(envelope.investment),
            updated_at: Set(Utc::now().into()),
        };
        budget_envelopes::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    budget_envelopes::Column::TenantId,
                    budget_envelopes::Column::Year,
                ])
                .update_columns([
                    budget_envelopes::Column::Functioning,
                    budget_envelopes::Column::Investment,
                    budget_envelopes::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(envelope)
    }

    async fn find_envelope(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Option<AnnualBudgetEnvelope>, ForecastError> {
        let model = budget_envelopes::Entity::find_by_id((tenant_id.0, year))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(convert::envelope))
    }
}
