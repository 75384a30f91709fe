//! Procurement document types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetops_shared::types::{
    BudgetLineId, ContractId, InvoiceId, PurchaseOrderId, TenantId, VendorId,
};

/// Contract lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Being drafted.
    Draft,
    /// Signed and running.
    #[default]
    Active,
    /// Ended normally.
    Closed,
    /// Cancelled before completion.
    Cancelled,
}

impl ContractStatus {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Invoice processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Received, not yet checked.
    #[default]
    Pending,
    /// Checked against the order.
    Validated,
    /// Paid out.
    Paid,
    /// Cancelled.
    Cancelled,
}

impl InvoiceStatus {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A contract engaging budget on a budget line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Contract ID.
    pub id: ContractId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Budget line engaged by the contract.
    pub budget_line_id: Option<BudgetLineId>,
    /// Contracting vendor.
    pub vendor_id: Option<VendorId>,
    /// Label.
    pub label: String,
    /// Contract amount.
    pub amount: Decimal,
    /// Start date. Determines the engaged year.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Status.
    pub status: ContractStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Year in which the contract engages budget.
    #[must_use]
    pub fn engaged_year(&self) -> i32 {
        self.start_date.year()
    }

    /// Cancelled contracts engage nothing.
    #[must_use]
    pub fn counts_as_engaged(&self) -> bool {
        self.status != ContractStatus::Cancelled
    }
}

/// An invoice realizing spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Budget line charged.
    pub budget_line_id: Option<BudgetLineId>,
    /// Contract the invoice is issued under.
    pub contract_id: Option<ContractId>,
    /// Issuing vendor.
    pub vendor_id: Option<VendorId>,
    /// Vendor invoice number.
    pub number: String,
    /// Invoice amount.
    pub amount: Decimal,
    /// Invoice date. Determines the invoiced year.
    pub invoice_date: NaiveDate,
    /// Status.
    pub status: InvoiceStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Year in which the invoice is counted.
    #[must_use]
    pub fn invoiced_year(&self) -> i32 {
        self.invoice_date.year()
    }

    /// Cancelled invoices realize nothing.
    #[must_use]
    pub fn counts_as_invoiced(&self) -> bool {
        self.status != InvoiceStatus::Cancelled
    }
}

/// A purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Purchase order ID.
    pub id: PurchaseOrderId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Budget line charged.
    pub budget_line_id: Option<BudgetLineId>,
    /// Supplying vendor.
    pub vendor_id: Option<VendorId>,
    /// Order number.
    pub number: String,
    /// Ordered amount.
    pub amount: Decimal,
    /// Order date.
    pub order_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a contract.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContractInput {
    /// Budget line engaged.
    pub budget_line_id: Option<BudgetLineId>,
    /// Vendor.
    pub vendor_id: Option<VendorId>,
    /// Label.
    pub label: String,
    /// Amount.
    pub amount: Decimal,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Status, `active` when omitted.
    #[serde(default)]
    pub status: ContractStatus,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceInput {
    /// Budget line charged.
    pub budget_line_id: Option<BudgetLineId>,
    /// Contract.
    pub contract_id: Option<ContractId>,
    /// Vendor.
    pub vendor_id: Option<VendorId>,
    /// Invoice number.
    pub number: String,
    /// Amount.
    pub amount: Decimal,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Status, `pending` when omitted.
    #[serde(default)]
    pub status: InvoiceStatus,
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseOrderInput {
    /// Budget line charged.
    pub budget_line_id: Option<BudgetLineId>,
    /// Vendor.
    pub vendor_id: Option<VendorId>,
    /// Order number.
    pub number: String,
    /// Amount.
    pub amount: Decimal,
    /// Order date.
    pub order_date: NaiveDate,
}
