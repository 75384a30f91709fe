//! Rollup records built from a tenant snapshot.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use budgetops_shared::types::{BudgetLineId, BudgetTypeId, DomainId, PoleId, VendorId};

use super::types::{DataSource, Metric};
use crate::allocation::{Ownership, PoleAllocation};
use crate::budget::{BudgetLine, Nature, YearlyBudget, YearlyFigures};
use crate::procurement::{Contract, Invoice};

/// Everything a rollup needs from storage for one tenant.
#[derive(Debug, Clone, Default)]
pub struct TenantSnapshot {
    /// Budget lines.
    pub budget_lines: Vec<BudgetLine>,
    /// Planned budgets of all lines.
    pub yearly_budgets: Vec<YearlyBudget>,
    /// Allocation sets keyed by line.
    pub allocations: HashMap<BudgetLineId, Vec<PoleAllocation>>,
    /// Contracts.
    pub contracts: Vec<Contract>,
    /// Invoices.
    pub invoices: Vec<Invoice>,
    /// Names of poles, domains, budget types and vendors.
    pub names: HashMap<Uuid, String>,
}

/// An identifier with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labelled<T> {
    /// Identifier.
    pub id: T,
    /// Display name.
    pub name: String,
}

/// One row the pipeline filters and groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupRecord {
    /// Document date, `None` for budget line-years.
    pub date: Option<NaiveDate>,
    /// Year of the record.
    pub year: Option<i32>,
    /// Document status.
    pub status: Option<String>,
    /// Vendor.
    pub vendor: Option<Labelled<VendorId>>,
    /// Domain of the budget line.
    pub domain: Option<Labelled<DomainId>>,
    /// Budget type of the budget line.
    pub budget_type: Option<Labelled<BudgetTypeId>>,
    /// Nature of the budget line.
    pub nature: Option<Nature>,
    /// Ownership of the budget line.
    pub ownership: Ownership,
    /// Largest-share pole of the budget line.
    pub pole: Option<Labelled<PoleId>>,
    /// Planned budget.
    pub budget: Decimal,
    /// Engaged amount.
    pub engaged: Decimal,
    /// Invoiced amount.
    pub invoiced: Decimal,
    /// Document amount, or planned budget for line-years.
    pub amount: Decimal,
}

impl RollupRecord {
    /// Value of a metric.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Decimal {
        match metric {
            Metric::Budget => self.budget,
            Metric::Engaged => self.engaged,
            Metric::Invoiced => self.invoiced,
            Metric::Remaining => self.budget - self.engaged,
            Metric::Amount => self.amount,
        }
    }

    /// Year of the record, from the year field or the date.
    #[must_use]
    pub fn effective_year(&self) -> Option<i32> {
        self.year.or_else(|| self.date.map(|d| d.year()))
    }
}

/// Classification of a budget line resolved against catalog names.
struct LineContext {
    domain: Option<Labelled<DomainId>>,
    budget_type: Option<Labelled<BudgetTypeId>>,
    nature: Option<Nature>,
    ownership: Ownership,
    pole: Option<Labelled<PoleId>>,
}

impl LineContext {
    fn unlinked() -> Self {
        Self {
            domain: None,
            budget_type: None,
            nature: None,
            ownership: Ownership::Unassigned,
            pole: None,
        }
    }

    fn resolve(line: &BudgetLine, snapshot: &TenantSnapshot) -> Self {
        let allocations = snapshot
            .allocations
            .get(&line.id)
            .cloned()
            .unwrap_or_default();
        let ownership = Ownership::from_legacy(line.pole_id, allocations);
        let pole = ownership
            .primary_pole()
            .and_then(|id| label(snapshot, id, id.0));
        Self {
            domain: line.domain_id.and_then(|id| label(snapshot, id, id.0)),
            budget_type: line.budget_type_id.and_then(|id| label(snapshot, id, id.0)),
            nature: Some(line.nature),
            ownership,
            pole,
        }
    }
}

fn label<T>(snapshot: &TenantSnapshot, id: T, raw: Uuid) -> Option<Labelled<T>> {
    snapshot.names.get(&raw).map(|name| Labelled {
        id,
        name: name.clone(),
    })
}

/// Builds the records of a source.
///
/// Budget line records cover every year with a planned budget or a linked
/// document; engaged and invoiced amounts are derived as for yearly figures.
/// Documents inherit the classification of their budget line.
#[must_use]
pub fn build_records(snapshot: &TenantSnapshot, source: DataSource) -> Vec<RollupRecord> {
    let contexts: HashMap<BudgetLineId, LineContext> = snapshot
        .budget_lines
        .iter()
        .map(|line| (line.id, LineContext::resolve(line, snapshot)))
        .collect();
    let unlinked = LineContext::unlinked();
    let context_of = |line: Option<BudgetLineId>| {
        line.and_then(|id| contexts.get(&id)).unwrap_or(&unlinked)
    };

    match source {
        DataSource::BudgetLines => line_year_records(snapshot, &contexts),
        DataSource::Invoices => snapshot
            .invoices
            .iter()
            .map(|invoice| {
                let ctx = context_of(invoice.budget_line_id);
                RollupRecord {
                    date: Some(invoice.invoice_date),
                    year: Some(invoice.invoiced_year()),
                    status: Some(invoice.status.as_str().to_string()),
                    vendor: invoice.vendor_id.and_then(|id| label(snapshot, id, id.0)),
                    domain: ctx.domain.clone(),
                    budget_type: ctx.budget_type.clone(),
                    nature: ctx.nature,
                    ownership: ctx.ownership.clone(),
                    pole: ctx.pole.clone(),
                    budget: Decimal::ZERO,
                    engaged: Decimal::ZERO,
                    invoiced: invoice.amount,
                    amount: invoice.amount,
                }
            })
            .collect(),
        DataSource::Contracts => snapshot
            .contracts
            .iter()
            .map(|contract| {
                let ctx = context_of(contract.budget_line_id);
                RollupRecord {
                    date: Some(contract.start_date),
                    year: Some(contract.engaged_year()),
                    status: Some(contract.status.as_str().to_string()),
                    vendor: contract.vendor_id.and_then(|id| label(snapshot, id, id.0)),
                    domain: ctx.domain.clone(),
                    budget_type: ctx.budget_type.clone(),
                    nature: ctx.nature,
                    ownership: ctx.ownership.clone(),
                    pole: ctx.pole.clone(),
                    budget: Decimal::ZERO,
                    engaged: contract.amount,
                    invoiced: Decimal::ZERO,
                    amount: contract.amount,
                }
            })
            .collect(),
    }
}

fn line_year_records(
    snapshot: &TenantSnapshot,
    contexts: &HashMap<BudgetLineId, LineContext>,
) -> Vec<RollupRecord> {
    let mut budgets: HashMap<BudgetLineId, Vec<YearlyBudget>> = HashMap::new();
    for budget in &snapshot.yearly_budgets {
        budgets.entry(budget.budget_line_id).or_default().push(budget.clone());
    }
    let mut contracts: HashMap<BudgetLineId, Vec<Contract>> = HashMap::new();
    for contract in &snapshot.contracts {
        if let Some(line) = contract.budget_line_id {
            contracts.entry(line).or_default().push(contract.clone());
        }
    }
    let mut invoices: HashMap<BudgetLineId, Vec<Invoice>> = HashMap::new();
    for invoice in &snapshot.invoices {
        if let Some(line) = invoice.budget_line_id {
            invoices.entry(line).or_default().push(invoice.clone());
        }
    }

    let mut records = Vec::new();
    for line in &snapshot.budget_lines {
        let Some(ctx) = contexts.get(&line.id) else {
            continue;
        };
        let history = YearlyFigures::history(
            budgets.get(&line.id).map_or(&[][..], Vec::as_slice),
            contracts.get(&line.id).map_or(&[][..], Vec::as_slice),
            invoices.get(&line.id).map_or(&[][..], Vec::as_slice),
        );
        // Oldest year first.
        for figures in history.into_iter().rev() {
            records.push(RollupRecord {
                date: None,
                year: Some(figures.year),
                status: None,
                vendor: None,
                domain: ctx.domain.clone(),
                budget_type: ctx.budget_type.clone(),
                nature: ctx.nature,
                ownership: ctx.ownership.clone(),
                pole: ctx.pole.clone(),
                budget: figures.budget,
                engaged: figures.engaged,
                invoiced: figures.invoiced,
                amount: figures.budget,
            });
        }
    }
    records
}
