//! Conversions between database models and domain types.

use chrono::Utc;
use sea_orm::DbErr;

use budgetops_core::allocation::PoleAllocation;
use budgetops_core::budget::{BudgetLine, Nature, YearlyBudget};
use budgetops_core::catalog::{CatalogEntry, CatalogKind};
use budgetops_core::forecast::{AnnualBudgetEnvelope, ForecastBudgetLine, ForecastExpense};
use budgetops_core::procurement::{Contract, ContractStatus, Invoice, InvoiceStatus, PurchaseOrder};
use budgetops_shared::types::{
    BudgetLineId, BudgetTypeId, ContractId, DomainId, ForecastBudgetLineId, ForecastExpenseId,
    InvoiceId, PoleId, PurchaseOrderId, TenantId, VendorId,
};

use crate::entities::{
    budget_envelopes, budget_lines, catalog_entries, contracts, forecast_budget_lines,
    forecast_expenses, invoices, pole_allocations, purchase_orders, yearly_budgets,
};

fn unknown(column: &str, value: &str) -> DbErr {
    DbErr::Custom(format!("unknown {column} value '{value}'"))
}

pub(crate) fn nature_from_db(value: &str) -> Result<Nature, DbErr> {
    match value {
        "functioning" => Ok(Nature::Functioning),
        "investment" => Ok(Nature::Investment),
        other => Err(unknown("nature", other)),
    }
}

pub(crate) fn catalog_kind_to_db(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Pole => "pole",
        CatalogKind::Domain => "domain",
        CatalogKind::BudgetType => "budget_type",
        CatalogKind::Vendor => "vendor",
    }
}

fn catalog_kind_from_db(value: &str) -> Result<CatalogKind, DbErr> {
    match value {
        "pole" => Ok(CatalogKind::Pole),
        "domain" => Ok(CatalogKind::Domain),
        "budget_type" => Ok(CatalogKind::BudgetType),
        "vendor" => Ok(CatalogKind::Vendor),
        other => Err(unknown("catalog kind", other)),
    }
}

fn contract_status_from_db(value: &str) -> Result<ContractStatus, DbErr> {
    match value {
        "draft" => Ok(ContractStatus::Draft),
        "active" => Ok(ContractStatus::Active),
        "closed" => Ok(ContractStatus::Closed),
        "cancelled" => Ok(ContractStatus::Cancelled),
        other => Err(unknown("contract status", other)),
    }
}

fn invoice_status_from_db(value: &str) -> Result<InvoiceStatus, DbErr> {
    match value {
        "pending" => Ok(InvoiceStatus::Pending),
        "validated" => Ok(InvoiceStatus::Validated),
        "paid" => Ok(InvoiceStatus::Paid),
        "cancelled" => Ok(InvoiceStatus::Cancelled),
        other => Err(unknown("invoice status", other)),
    }
}

pub(crate) fn budget_line(model: budget_lines::Model) -> Result<BudgetLine, DbErr> {
    Ok(BudgetLine {
        id: BudgetLineId(model.id),
        tenant_id: TenantId(model.tenant_id),
        label: model.label,
        nature: nature_from_db(&model.nature)?,
        budget_type_id: model.budget_type_id.map(BudgetTypeId),
        domain_id: model.domain_id.map(DomainId),
        accounting_code: model.accounting_code,
        pole_id: model.pole_id.map(PoleId),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn yearly_budget(model: yearly_budgets::Model) -> YearlyBudget {
    YearlyBudget {
        budget_line_id: BudgetLineId(model.budget_line_id),
        year: model.year,
        amount: model.amount,
    }
}

pub(crate) fn pole_allocation(model: pole_allocations::Model) -> PoleAllocation {
    PoleAllocation {
        pole_id: PoleId(model.pole_id),
        percentage: model.percentage,
    }
}

pub(crate) fn contract(model: contracts::Model) -> Result<Contract, DbErr> {
    Ok(Contract {
        id: ContractId(model.id),
        tenant_id: TenantId(model.tenant_id),
        budget_line_id: model.budget_line_id.map(BudgetLineId),
        vendor_id: model.vendor_id.map(VendorId),
        label: model.label,
        amount: model.amount,
        start_date: model.start_date,
        end_date: model.end_date,
        status: contract_status_from_db(&model.status)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub(crate) fn invoice(model: invoices::Model) -> Result<Invoice, DbErr> {
    Ok(Invoice {
        id: InvoiceId(model.id),
        tenant_id: TenantId(model.tenant_id),
        budget_line_id: model.budget_line_id.map(BudgetLineId),
        contract_id: model.contract_id.map(ContractId),
        vendor_id: model.vendor_id.map(VendorId),
        number: model.number,
        amount: model.amount,
        invoice_date: model.invoice_date,
        status: invoice_status_from_db(&model.status)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub(crate) fn purchase_order(model: purchase_orders::Model) -> PurchaseOrder {
    PurchaseOrder {
        id: PurchaseOrderId(model.id),
        tenant_id: TenantId(model.tenant_id),
        budget_line_id: model.budget_line_id.map(BudgetLineId),
        vendor_id: model.vendor_id.map(VendorId),
        number: model.number,
        amount: model.amount,
        order_date: model.order_date,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn catalog_entry(model: catalog_entries::Model) -> Result<CatalogEntry, DbErr> {
    Ok(CatalogEntry {
        id: model.id,
        tenant_id: TenantId(model.tenant_id),
        kind: catalog_kind_from_db(&model.kind)?,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub(crate) fn forecast_line(
    model: forecast_budget_lines::Model,
) -> Result<ForecastBudgetLine, DbErr> {
    Ok(ForecastBudgetLine {
        id: ForecastBudgetLineId(model.id),
        tenant_id: TenantId(model.tenant_id),
        label: model.label,
        nature: nature_from_db(&model.nature)?,
        budget_type_id: model.budget_type_id.map(BudgetTypeId),
        domain_id: model.domain_id.map(DomainId),
        year: model.year,
        budget: model.budget,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

/// Expense without its links; the caller fills the link sets.
pub(crate) fn forecast_expense(model: forecast_expenses::Model) -> ForecastExpense {
    ForecastExpense {
        id: ForecastExpenseId(model.id),
        tenant_id: TenantId(model.tenant_id),
        forecast_line_id: ForecastBudgetLineId(model.forecast_line_id),
        label: model.label,
        description: model.description,
        amount: model.amount,
        year: model.year,
        purchase_order_ids: std::collections::BTreeSet::new(),
        invoice_ids: std::collections::BTreeSet::new(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn envelope(model: budget_envelopes::Model) -> AnnualBudgetEnvelope {
    AnnualBudgetEnvelope {
        tenant_id: TenantId(model.tenant_id),
        year: model.year,
        functioning: model.functioning,
        investment: model.investment,
    }
}
