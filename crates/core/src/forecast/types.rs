//! Forecast data types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetops_shared::types::{
    BudgetTypeId, DomainId, ForecastBudgetLineId, ForecastExpenseId, InvoiceId, PurchaseOrderId,
    TenantId,
};

use super::error::ForecastError;
use crate::budget::Nature;

/// Planning-time budget line of a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastBudgetLine {
    /// Forecast line ID.
    pub id: ForecastBudgetLineId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Label.
    pub label: String,
    /// Spending nature.
    pub nature: Nature,
    /// Budget type classification.
    pub budget_type_id: Option<BudgetTypeId>,
    /// Domain classification.
    pub domain_id: Option<DomainId>,
    /// Fiscal year.
    pub year: i32,
    /// Allocated budget.
    pub budget: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a forecast line.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForecastLineInput {
    /// Label.
    pub label: String,
    /// Spending nature.
    pub nature: Nature,
    /// Budget type classification.
    pub budget_type_id: Option<BudgetTypeId>,
    /// Domain classification.
    pub domain_id: Option<DomainId>,
    /// Fiscal year.
    pub year: i32,
    /// Allocated budget.
    #[serde(default)]
    pub budget: Decimal,
}

/// Planned expense under a forecast line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastExpense {
    /// Expense ID.
    pub id: ForecastExpenseId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Parent forecast line.
    pub forecast_line_id: ForecastBudgetLineId,
    /// Label.
    pub label: String,
    /// Optional description.
    pub description: Option<String>,
    /// Planned amount.
    pub amount: Decimal,
    /// Fiscal year, inherited from the parent line.
    pub year: i32,
    /// Linked purchase orders.
    pub purchase_order_ids: BTreeSet<PurchaseOrderId>,
    /// Linked invoices.
    pub invoice_ids: BTreeSet<InvoiceId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ForecastExpense {
    /// Realized once at least one invoice is linked.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        !self.invoice_ids.is_empty()
    }

    /// Engaged once at least one purchase order is linked.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        !self.purchase_order_ids.is_empty()
    }

    /// Applies a patch in place.
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some((line_id, year)) = patch.reassign_to {
            self.forecast_line_id = line_id;
            self.year = year;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for creating a forecast expense.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseInput {
    /// Parent forecast line.
    pub forecast_line_id: ForecastBudgetLineId,
    /// Label.
    pub label: String,
    /// Planned amount.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// Input for editing a forecast expense. Omitted fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpenseInput {
    /// New label.
    pub label: Option<String>,
    /// New planned amount.
    pub amount: Option<Decimal>,
    /// New description; an empty string clears it.
    pub description: Option<String>,
}

/// Validated change applied by the repository under the realized check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    /// New label.
    pub label: Option<String>,
    /// New planned amount.
    pub amount: Option<Decimal>,
    /// New description, `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Move under another forecast line, taking its year.
    pub reassign_to: Option<(ForecastBudgetLineId, i32)>,
}

/// Outcome of a write guarded by the realized check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseWrite<T> {
    /// The write went through.
    Applied(T),
    /// The expense does not exist.
    NotFound,
    /// The expense is realized.
    Locked,
}

/// Functioning and investment ceilings of a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualBudgetEnvelope {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Fiscal year.
    pub year: i32,
    /// Functioning ceiling.
    pub functioning: Decimal,
    /// Investment ceiling.
    pub investment: Decimal,
}

impl AnnualBudgetEnvelope {
    /// Ceiling for a nature.
    #[must_use]
    pub fn ceiling(&self, nature: Nature) -> Decimal {
        match nature {
            Nature::Functioning => self.functioning,
            Nature::Investment => self.investment,
        }
    }
}

/// A bulk item that failed.
#[derive(Debug)]
pub struct BulkFailure {
    /// Expense the item targeted.
    pub expense_id: ForecastExpenseId,
    /// Why it failed.
    pub error: ForecastError,
}

/// Per-item tally of a bulk operation.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Items that went through.
    pub succeeded: Vec<ForecastExpenseId>,
    /// Items that failed.
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Number of successful items.
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub(crate) fn record(
        &mut self,
        expense_id: ForecastExpenseId,
        result: Result<(), ForecastError>,
    ) {
        match result {
            Ok(()) => self.succeeded.push(expense_id),
            Err(error) => self.failed.push(BulkFailure { expense_id, error }),
        }
    }
}
