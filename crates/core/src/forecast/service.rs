//! Forecast reconciliation service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use budgetops_shared::types::{
    EntityKind, ForecastBudgetLineId, ForecastExpenseId, InvoiceId, PurchaseOrderId, TenantId,
};

use super::error::ForecastError;
use super::totals::{EnvelopeComparison, ExpenseTotals, ForecastLineTotals, ForecastRollup};
use super::types::{
    AnnualBudgetEnvelope, BulkOutcome, CreateExpenseInput, CreateForecastLineInput, ExpensePatch,
    ExpenseWrite, ForecastBudgetLine, ForecastExpense, UpdateExpenseInput,
};
use crate::fiscal::ensure_plausible_year;
use crate::integrity::GuardedDelete;

/// Repository trait for forecast persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// Guarded writes lock the expense row and check for linked invoices inside the
/// same transaction as the write; link writes take the same lock.
pub trait ForecastRepository: Send + Sync {
    /// Check that a referenced record exists for the tenant.
    fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, ForecastError>> + Send;

    /// Persist a forecast line.
    fn insert_forecast_line(
        &self,
        line: ForecastBudgetLine,
    ) -> impl std::future::Future<Output = Result<ForecastBudgetLine, ForecastError>> + Send;

    /// Find a forecast line.
    fn find_forecast_line(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> impl std::future::Future<
        Output = Result<Option<ForecastBudgetLine>, ForecastError>,
    > + Send;

    /// Forecast lines of a fiscal year.
    fn forecast_lines_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastBudgetLine>, ForecastError>> + Send;

    /// Delete a forecast line unless it owns expenses.
    fn delete_forecast_line_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> impl std::future::Future<Output = Result<GuardedDelete, ForecastError>> + Send;

    /// Persist an expense.
    fn insert_expense(
        &self,
        expense: ForecastExpense,
    ) -> impl std::future::Future<Output = Result<ForecastExpense, ForecastError>> + Send;

    /// Find an expense with its links.
    fn find_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> impl std::future::Future<Output = Result<Option<ForecastExpense>, ForecastError>> + Send;

    /// Expenses under a forecast line.
    fn expenses_for_line(
        &self,
        tenant_id: TenantId,
        line_id: ForecastBudgetLineId,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastExpense>, ForecastError>> + Send;

    /// Expenses of a fiscal year.
    fn expenses_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastExpense>, ForecastError>> + Send;

    /// Apply a patch unless the expense is realized.
    fn update_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        patch: ExpensePatch,
    ) -> impl std::future::Future<
        Output = Result<ExpenseWrite<ForecastExpense>, ForecastError>,
    > + Send;

    /// Delete an expense and its link rows unless it is realized.
    fn delete_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> impl std::future::Future<Output = Result<ExpenseWrite<()>, ForecastError>> + Send;

    /// Add a purchase order link. Existing links are kept. `None` if the
    /// expense does not exist.
    fn link_purchase_order(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        order_id: PurchaseOrderId,
    ) -> impl std::future::Future<Output = Result<Option<ForecastExpense>, ForecastError>> + Send;

    /// Add an invoice link. Existing links are kept. `None` if the expense
    /// does not exist.
    fn link_invoice(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        invoice_id: InvoiceId,
    ) -> impl std::future::Future<Output = Result<Option<ForecastExpense>, ForecastError>> + Send;

    /// Amounts of the given purchase orders.
    fn purchase_order_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<PurchaseOrderId>,
    ) -> impl std::future::Future<
        Output = Result<HashMap<PurchaseOrderId, Decimal>, ForecastError>,
    > + Send;

    /// Amounts of the given invoices.
    fn invoice_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<InvoiceId>,
    ) -> impl std::future::Future<
        Output = Result<HashMap<InvoiceId, Decimal>, ForecastError>,
    > + Send;

    /// Insert or replace the envelope of a year.
    fn upsert_envelope(
        &self,
        envelope: AnnualBudgetEnvelope,
    ) -> impl std::future::Future<Output = Result<AnnualBudgetEnvelope, ForecastError>> + Send;

    /// Envelope of a year.
    fn find_envelope(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> impl std::future::Future<
        Output = Result<Option<AnnualBudgetEnvelope>, ForecastError>,
    > + Send;
}

/// Forecast reconciliation service.
pub struct ForecastService<R: ForecastRepository> {
    repo: Arc<R>,
}

impl<R: ForecastRepository> ForecastService<R> {
    /// Create a new forecast service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ------------------------------------------------------------------------
    // Forecast lines
    // ------------------------------------------------------------------------

    /// Create a forecast line.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty label or implausible year and
    /// `InvalidReference` for an unknown budget type or domain.
    pub async fn create_forecast_line(
        &self,
        tenant_id: TenantId,
        input: CreateForecastLineInput,
    ) -> Result<ForecastBudgetLine, ForecastError> {
        let label = non_empty(&input.label, "Forecast line label")?;
        ensure_plausible_year(input.year).map_err(ForecastError::Validation)?;
        self.check_reference(
            tenant_id,
            EntityKind::BudgetType,
            input.budget_type_id.map(|id| id.0),
        )
        .await?;
        self.check_reference(tenant_id, EntityKind::Domain, input.domain_id.map(|id| id.0))
            .await?;

        let line = ForecastBudgetLine {
            id: ForecastBudgetLineId::new(),
            tenant_id,
            label,
            nature: input.nature,
            budget_type_id: input.budget_type_id,
            domain_id: input.domain_id,
            year: input.year,
            budget: input.budget,
            created_at: Utc::now(),
        };
        let line = self.repo.insert_forecast_line(line).await?;
        tracing::info!(
            tenant_id = %tenant_id,
            forecast_line_id = %line.id,
            year = line.year,
            "forecast line created"
        );
        Ok(line)
    }

    /// Get a forecast line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn get_forecast_line(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<ForecastBudgetLine, ForecastError> {
        self.repo
            .find_forecast_line(tenant_id, id)
            .await?
            .ok_or(ForecastError::NotFound {
                kind: EntityKind::ForecastBudgetLine,
                id: id.0,
            })
    }

    /// Forecast lines of a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_forecast_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastBudgetLine>, ForecastError> {
        self.repo.forecast_lines_for_year(tenant_id, year).await
    }

    /// Delete a forecast line that owns no expenses.
    ///
    /// # Errors
    ///
    /// Returns `ReferentialIntegrity` while expenses remain and `NotFound` if
    /// the line does not exist.
    pub async fn delete_forecast_line(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<(), ForecastError> {
        match self.repo.delete_forecast_line_guarded(tenant_id, id).await? {
            GuardedDelete::Deleted => {
                tracing::info!(
                    tenant_id = %tenant_id,
                    forecast_line_id = %id,
                    "forecast line deleted"
                );
                Ok(())
            }
            GuardedDelete::NotFound => Err(ForecastError::NotFound {
                kind: EntityKind::ForecastBudgetLine,
                id: id.0,
            }),
            GuardedDelete::Blocked(refs) => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    forecast_line_id = %id,
                    references = %refs,
                    "forecast line deletion refused"
                );
                Err(ForecastError::ReferentialIntegrity(refs))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------------

    /// Create an expense under a forecast line. The expense takes the line's year.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty label or a non-positive amount and
    /// `InvalidReference` if the parent line does not exist.
    pub async fn create_expense(
        &self,
        tenant_id: TenantId,
        input: CreateExpenseInput,
    ) -> Result<ForecastExpense, ForecastError> {
        let label = non_empty(&input.label, "Expense label")?;
        positive(input.amount)?;

        let line = self
            .repo
            .find_forecast_line(tenant_id, input.forecast_line_id)
            .await?
            .ok_or(ForecastError::InvalidReference {
                kind: EntityKind::ForecastBudgetLine,
                id: input.forecast_line_id.0,
            })?;

        let now = Utc::now();
        let expense = ForecastExpense {
            id: ForecastExpenseId::new(),
            tenant_id,
            forecast_line_id: line.id,
            label,
            description: clean_description(input.description),
            amount: input.amount,
            year: line.year,
            purchase_order_ids: Default::default(),
            invoice_ids: Default::default(),
            created_at: now,
            updated_at: now,
        };
        let expense = self.repo.insert_expense(expense).await?;
        tracing::info!(
            tenant_id = %tenant_id,
            expense_id = %expense.id,
            forecast_line_id = %line.id,
            "forecast expense created"
        );
        Ok(expense)
    }

    /// Get an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub async fn get_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<ForecastExpense, ForecastError> {
        self.repo
            .find_expense(tenant_id, id)
            .await?
            .ok_or_else(|| ForecastError::expense_not_found(id))
    }

    /// Expenses under a forecast line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn list_expenses(
        &self,
        tenant_id: TenantId,
        line_id: ForecastBudgetLineId,
    ) -> Result<Vec<ForecastExpense>, ForecastError> {
        self.get_forecast_line(tenant_id, line_id).await?;
        self.repo.expenses_for_line(tenant_id, line_id).await
    }

    /// Edit an expense.
    ///
    /// # Errors
    ///
    /// Returns `Locked` if an invoice is linked, `Validation` for an empty
    /// label or non-positive amount, `NotFound` if the expense does not exist.
    pub async fn update_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        input: UpdateExpenseInput,
    ) -> Result<ForecastExpense, ForecastError> {
        let label = input
            .label
            .as_deref()
            .map(|l| non_empty(l, "Expense label"))
            .transpose()?;
        if let Some(amount) = input.amount {
            positive(amount)?;
        }
        let patch = ExpensePatch {
            label,
            amount: input.amount,
            description: input.description.map(|d| clean_description(Some(d))),
            reassign_to: None,
        };
        self.guarded_update(tenant_id, id, patch).await
    }

    /// Delete an expense and its links.
    ///
    /// # Errors
    ///
    /// Returns `Locked` if an invoice is linked and `NotFound` if the expense
    /// does not exist.
    pub async fn delete_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<(), ForecastError> {
        match self.repo.delete_expense_unless_realized(tenant_id, id).await? {
            ExpenseWrite::Applied(()) => {
                tracing::info!(
                    tenant_id = %tenant_id,
                    expense_id = %id,
                    "forecast expense deleted"
                );
                Ok(())
            }
            ExpenseWrite::NotFound => Err(ForecastError::expense_not_found(id)),
            ExpenseWrite::Locked => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    expense_id = %id,
                    "delete of realized expense refused"
                );
                Err(ForecastError::Locked(id))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    /// Link a purchase order. Linking twice is a no-op; realized expenses
    /// accept links.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the purchase order does not exist and
    /// `NotFound` if the expense does not exist.
    pub async fn link_purchase_order(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        order_id: PurchaseOrderId,
    ) -> Result<ForecastExpense, ForecastError> {
        self.check_reference(tenant_id, EntityKind::PurchaseOrder, Some(order_id.0))
            .await?;
        let expense = self
            .repo
            .link_purchase_order(tenant_id, id, order_id)
            .await?
            .ok_or_else(|| ForecastError::expense_not_found(id))?;
        tracing::debug!(
            tenant_id = %tenant_id,
            expense_id = %id,
            purchase_order_id = %order_id,
            "purchase order linked"
        );
        Ok(expense)
    }

    /// Link an invoice, realizing the expense. Linking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the invoice does not exist and
    /// `NotFound` if the expense does not exist.
    pub async fn link_invoice(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        invoice_id: InvoiceId,
    ) -> Result<ForecastExpense, ForecastError> {
        self.check_reference(tenant_id, EntityKind::Invoice, Some(invoice_id.0))
            .await?;
        let expense = self
            .repo
            .link_invoice(tenant_id, id, invoice_id)
            .await?
            .ok_or_else(|| ForecastError::expense_not_found(id))?;
        tracing::debug!(
            tenant_id = %tenant_id,
            expense_id = %id,
            invoice_id = %invoice_id,
            "invoice linked"
        );
        Ok(expense)
    }

    // ------------------------------------------------------------------------
    // Totals
    // ------------------------------------------------------------------------

    /// Totals of one expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub async fn compute_totals(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<ExpenseTotals, ForecastError> {
        let expense = self.get_expense(tenant_id, id).await?;
        let mut totals = self
            .reconcile(tenant_id, std::slice::from_ref(&expense))
            .await?;
        totals
            .pop()
            .ok_or_else(|| ForecastError::expense_not_found(id))
    }

    /// Totals of a forecast line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn line_totals(
        &self,
        tenant_id: TenantId,
        line_id: ForecastBudgetLineId,
    ) -> Result<ForecastLineTotals, ForecastError> {
        let line = self.get_forecast_line(tenant_id, line_id).await?;
        let expenses = self.repo.expenses_for_line(tenant_id, line_id).await?;
        let totals = self.reconcile(tenant_id, &expenses).await?;
        Ok(ForecastLineTotals::from_expenses(&line, &totals))
    }

    /// Year rollup by line, nature and grand total.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn year_rollup(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<ForecastRollup, ForecastError> {
        let lines = self.repo.forecast_lines_for_year(tenant_id, year).await?;
        let expenses = self.repo.expenses_for_year(tenant_id, year).await?;
        let totals = self.reconcile(tenant_id, &expenses).await?;

        let mut by_line: HashMap<ForecastBudgetLineId, Vec<ExpenseTotals>> = HashMap::new();
        for (expense, total) in expenses.iter().zip(totals) {
            by_line.entry(expense.forecast_line_id).or_default().push(total);
        }

        let line_totals = lines
            .iter()
            .map(|line| {
                let expenses = by_line.get(&line.id).map_or(&[][..], Vec::as_slice);
                ForecastLineTotals::from_expenses(line, expenses)
            })
            .collect();
        Ok(ForecastRollup::from_lines(year, line_totals))
    }

    async fn reconcile(
        &self,
        tenant_id: TenantId,
        expenses: &[ForecastExpense],
    ) -> Result<Vec<ExpenseTotals>, ForecastError> {
        let order_ids: Vec<PurchaseOrderId> = expenses
            .iter()
            .flat_map(|e| e.purchase_order_ids.iter().copied())
            .collect();
        let invoice_ids: Vec<InvoiceId> = expenses
            .iter()
            .flat_map(|e| e.invoice_ids.iter().copied())
            .collect();

        let order_amounts = if order_ids.is_empty() {
            HashMap::new()
        } else {
            self.repo.purchase_order_amounts(tenant_id, order_ids).await?
        };
        let invoice_amounts = if invoice_ids.is_empty() {
            HashMap::new()
        } else {
            self.repo.invoice_amounts(tenant_id, invoice_ids).await?
        };

        Ok(expenses
            .iter()
            .map(|e| ExpenseTotals::reconcile(e, &order_amounts, &invoice_amounts))
            .collect())
    }

    // ------------------------------------------------------------------------
    // Envelope
    // ------------------------------------------------------------------------

    /// Set the ceilings of a year, replacing previous ones.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative ceiling or implausible year.
    pub async fn set_envelope(
        &self,
        tenant_id: TenantId,
        year: i32,
        functioning: Decimal,
        investment: Decimal,
    ) -> Result<AnnualBudgetEnvelope, ForecastError> {
        ensure_plausible_year(year).map_err(ForecastError::Validation)?;
        if functioning < Decimal::ZERO || investment < Decimal::ZERO {
            return Err(ForecastError::validation("Envelope ceilings cannot be negative"));
        }
        let envelope = self
            .repo
            .upsert_envelope(AnnualBudgetEnvelope {
                tenant_id,
                year,
                functioning,
                investment,
            })
            .await?;
        tracing::info!(tenant_id = %tenant_id, year, "budget envelope set");
        Ok(envelope)
    }

    /// Ceiling versus allocated budget per nature for a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn envelope_comparison(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<EnvelopeComparison, ForecastError> {
        let envelope = self.repo.find_envelope(tenant_id, year).await?;
        let lines = self.repo.forecast_lines_for_year(tenant_id, year).await?;
        Ok(EnvelopeComparison::compute(year, envelope.as_ref(), &lines))
    }

    // ------------------------------------------------------------------------
    // Bulk actions
    // ------------------------------------------------------------------------

    /// Delete several expenses. Each item is independent.
    ///
    /// # Errors
    ///
    /// Never fails as a whole; per-item errors are reported in the outcome.
    pub async fn bulk_delete(
        &self,
        tenant_id: TenantId,
        ids: &[ForecastExpenseId],
    ) -> Result<BulkOutcome, ForecastError> {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            outcome.record(id, self.delete_expense(tenant_id, id).await);
        }
        log_bulk(tenant_id, "delete", &outcome);
        Ok(outcome)
    }

    /// Move several expenses under another forecast line, taking its year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the target line does not exist; per-item
    /// errors are reported in the outcome.
    pub async fn bulk_reassign(
        &self,
        tenant_id: TenantId,
        ids: &[ForecastExpenseId],
        target: ForecastBudgetLineId,
    ) -> Result<BulkOutcome, ForecastError> {
        let line = self
            .repo
            .find_forecast_line(tenant_id, target)
            .await?
            .ok_or(ForecastError::InvalidReference {
                kind: EntityKind::ForecastBudgetLine,
                id: target.0,
            })?;

        let mut outcome = BulkOutcome::default();
        for &id in ids {
            let patch = ExpensePatch {
                reassign_to: Some((line.id, line.year)),
                ..ExpensePatch::default()
            };
            let result = self.guarded_update(tenant_id, id, patch).await.map(|_| ());
            outcome.record(id, result);
        }
        log_bulk(tenant_id, "reassign", &outcome);
        Ok(outcome)
    }

    /// Multiply the planned amount of several expenses by `coefficient`,
    /// rounding to 2 decimal places.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the coefficient is not positive; per-item
    /// errors are reported in the outcome.
    pub async fn bulk_apply_coefficient(
        &self,
        tenant_id: TenantId,
        ids: &[ForecastExpenseId],
        coefficient: Decimal,
    ) -> Result<BulkOutcome, ForecastError> {
        if coefficient <= Decimal::ZERO {
            return Err(ForecastError::validation("Coefficient must be positive"));
        }

        let mut outcome = BulkOutcome::default();
        for &id in ids {
            let result = self.scale_expense(tenant_id, id, coefficient).await;
            outcome.record(id, result);
        }
        log_bulk(tenant_id, "apply_coefficient", &outcome);
        Ok(outcome)
    }

    async fn scale_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        coefficient: Decimal,
    ) -> Result<(), ForecastError> {
        let expense = self.get_expense(tenant_id, id).await?;
        if expense.is_realized() {
            return Err(ForecastError::Locked(id));
        }
        let amount = expense
            .amount
            .checked_mul(coefficient)
            .ok_or_else(|| ForecastError::validation("Scaled amount overflows"))?
            .round_dp(2);
        positive(amount)?;
        let patch = ExpensePatch {
            amount: Some(amount),
            ..ExpensePatch::default()
        };
        self.guarded_update(tenant_id, id, patch).await.map(|_| ())
    }

    async fn guarded_update(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        patch: ExpensePatch,
    ) -> Result<ForecastExpense, ForecastError> {
        match self
            .repo
            .update_expense_unless_realized(tenant_id, id, patch)
            .await?
        {
            ExpenseWrite::Applied(expense) => {
                tracing::debug!(
                    tenant_id = %tenant_id,
                    expense_id = %id,
                    "forecast expense updated"
                );
                Ok(expense)
            }
            ExpenseWrite::NotFound => Err(ForecastError::expense_not_found(id)),
            ExpenseWrite::Locked => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    expense_id = %id,
                    "edit of realized expense refused"
                );
                Err(ForecastError::Locked(id))
            }
        }
    }

    async fn check_reference(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Option<Uuid>,
    ) -> Result<(), ForecastError> {
        let Some(id) = id else {
            return Ok(());
        };
        if self.repo.reference_exists(tenant_id, kind, id).await? {
            Ok(())
        } else {
            tracing::warn!(tenant_id = %tenant_id, %kind, %id, "forecast reference missing");
            Err(ForecastError::InvalidReference { kind, id })
        }
    }
}

fn log_bulk(tenant_id: TenantId, action: &str, outcome: &BulkOutcome) {
    tracing::info!(
        tenant_id = %tenant_id,
        action,
        succeeded = outcome.succeeded_count(),
        failed = outcome.failed_count(),
        "bulk expense action finished"
    );
}

fn non_empty(value: &str, what: &str) -> Result<String, ForecastError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ForecastError::validation(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn positive(amount: Decimal) -> Result<(), ForecastError> {
    if amount <= Decimal::ZERO {
        return Err(ForecastError::validation("Amount must be positive"));
    }
    Ok(())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
