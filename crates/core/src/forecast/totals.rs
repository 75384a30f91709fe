//! Reconciliation totals, recomputed on every read.

use std::collections::HashMap;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::Serialize;

use budgetops_shared::types::{ForecastBudgetLineId, ForecastExpenseId, InvoiceId, PurchaseOrderId};

use super::types::{AnnualBudgetEnvelope, ForecastBudgetLine, ForecastExpense};
use crate::budget::Nature;

/// Stage an expense has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// No linked document.
    Planned,
    /// Purchase orders linked, no invoice yet.
    Engaged,
    /// At least one invoice linked.
    Realized,
}

impl ReconciliationStatus {
    /// Stage of an expense.
    #[must_use]
    pub fn of(expense: &ForecastExpense) -> Self {
        if expense.is_realized() {
            Self::Realized
        } else if expense.is_engaged() {
            Self::Engaged
        } else {
            Self::Planned
        }
    }
}

/// Planned, engaged and realized amounts. `variance = realized - planned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationTotals {
    /// Planned amount.
    pub planned: Decimal,
    /// Sum of linked purchase orders.
    pub engaged: Decimal,
    /// Sum of linked invoices.
    pub realized: Decimal,
    /// `realized - planned`.
    pub variance: Decimal,
}

impl ReconciliationTotals {
    /// Totals from component amounts.
    #[must_use]
    pub fn new(planned: Decimal, engaged: Decimal, realized: Decimal) -> Self {
        Self {
            planned,
            engaged,
            realized,
            variance: realized - planned,
        }
    }
}

impl Add for ReconciliationTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.planned + rhs.planned,
            self.engaged + rhs.engaged,
            self.realized + rhs.realized,
        )
    }
}

impl AddAssign for ReconciliationTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for ReconciliationTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Totals of one expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpenseTotals {
    /// Expense.
    pub expense_id: ForecastExpenseId,
    /// Amounts.
    #[serde(flatten)]
    pub totals: ReconciliationTotals,
    /// Stage.
    pub status: ReconciliationStatus,
}

impl ExpenseTotals {
    /// Reconciles an expense against the amounts of its linked documents.
    ///
    /// Documents missing from the amount maps contribute nothing.
    #[must_use]
    pub fn reconcile(
        expense: &ForecastExpense,
        order_amounts: &HashMap<PurchaseOrderId, Decimal>,
        invoice_amounts: &HashMap<InvoiceId, Decimal>,
    ) -> Self {
        let engaged = expense
            .purchase_order_ids
            .iter()
            .filter_map(|id| order_amounts.get(id))
            .copied()
            .sum();
        let realized = expense
            .invoice_ids
            .iter()
            .filter_map(|id| invoice_amounts.get(id))
            .copied()
            .sum();
        Self {
            expense_id: expense.id,
            totals: ReconciliationTotals::new(expense.amount, engaged, realized),
            status: ReconciliationStatus::of(expense),
        }
    }
}

/// Totals of one forecast line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastLineTotals {
    /// Forecast line.
    pub forecast_line_id: ForecastBudgetLineId,
    /// Label.
    pub label: String,
    /// Nature.
    pub nature: Nature,
    /// Allocated budget of the line.
    pub budget: Decimal,
    /// Number of expenses.
    pub expense_count: usize,
    /// Expense totals.
    #[serde(flatten)]
    pub totals: ReconciliationTotals,
}

impl ForecastLineTotals {
    /// Sums expense totals under a line.
    #[must_use]
    pub fn from_expenses(line: &ForecastBudgetLine, expenses: &[ExpenseTotals]) -> Self {
        Self {
            forecast_line_id: line.id,
            label: line.label.clone(),
            nature: line.nature,
            budget: line.budget,
            expense_count: expenses.len(),
            totals: expenses.iter().map(|e| e.totals).sum(),
        }
    }

    /// `budget - planned`: budget not yet planned as expenses.
    #[must_use]
    pub fn unplanned(&self) -> Decimal {
        self.budget - self.totals.planned
    }
}

/// Totals of one nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NatureTotals {
    /// Nature.
    pub nature: Nature,
    /// Allocated budget of the nature's lines.
    pub budget: Decimal,
    /// Expense totals.
    #[serde(flatten)]
    pub totals: ReconciliationTotals,
}

/// Year-level reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastRollup {
    /// Fiscal year.
    pub year: i32,
    /// Per line.
    pub lines: Vec<ForecastLineTotals>,
    /// Per nature, both natures always present.
    pub by_nature: Vec<NatureTotals>,
    /// Allocated budget of all lines.
    pub budget: Decimal,
    /// Grand total.
    pub grand_total: ReconciliationTotals,
}

impl ForecastRollup {
    /// Builds the rollup from line totals.
    #[must_use]
    pub fn from_lines(year: i32, lines: Vec<ForecastLineTotals>) -> Self {
        let by_nature = Nature::ALL
            .iter()
            .map(|&nature| {
                let of_nature = lines.iter().filter(|l| l.nature == nature);
                NatureTotals {
                    nature,
                    budget: of_nature.clone().map(|l| l.budget).sum(),
                    totals: of_nature.map(|l| l.totals).sum(),
                }
            })
            .collect();
        let budget = lines.iter().map(|l| l.budget).sum();
        let grand_total = lines.iter().map(|l| l.totals).sum();
        Self {
            year,
            lines,
            by_nature,
            budget,
            grand_total,
        }
    }

    /// Totals for a nature.
    #[must_use]
    pub fn nature(&self, nature: Nature) -> Option<&NatureTotals> {
        self.by_nature.iter().find(|n| n.nature == nature)
    }
}

/// Ceiling versus allocated budget of one nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvelopeUsage {
    /// Nature.
    pub nature: Nature,
    /// Ceiling, `None` when the year has no envelope.
    pub ceiling: Option<Decimal>,
    /// Sum of forecast line budgets of this nature.
    pub allocated: Decimal,
    /// `ceiling - allocated`, may be negative.
    pub remaining: Option<Decimal>,
}

/// Envelope comparison of a fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvelopeComparison {
    /// Fiscal year.
    pub year: i32,
    /// Functioning usage.
    pub functioning: EnvelopeUsage,
    /// Investment usage.
    pub investment: EnvelopeUsage,
}

impl EnvelopeComparison {
    /// Compares an optional envelope against the year's forecast lines.
    ///
    /// The envelope is informational and never enforced.
    #[must_use]
    pub fn compute(
        year: i32,
        envelope: Option<&AnnualBudgetEnvelope>,
        lines: &[ForecastBudgetLine],
    ) -> Self {
        let usage = |nature: Nature| {
            let allocated = lines
                .iter()
                .filter(|l| l.nature == nature)
                .map(|l| l.budget)
                .sum();
            let ceiling = envelope.map(|e| e.ceiling(nature));
            EnvelopeUsage {
                nature,
                ceiling,
                allocated,
                remaining: ceiling.map(|c| c - allocated),
            }
        };
        Self {
            year,
            functioning: usage(Nature::Functioning),
            investment: usage(Nature::Investment),
        }
    }
}
