//! Entity kinds used to describe references between records.

use serde::{Deserialize, Serialize};

/// Kind of a stored entity.
///
/// Used by reference errors ("pole 0190... does not exist") and by deletion
/// guards that report which kinds of records still point at a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Budget line.
    BudgetLine,
    /// Cost-sharing pole.
    Pole,
    /// Budget domain classification.
    Domain,
    /// Budget type classification.
    BudgetType,
    /// Vendor.
    Vendor,
    /// Contract.
    Contract,
    /// Invoice.
    Invoice,
    /// Purchase order.
    PurchaseOrder,
    /// Forecast budget line.
    ForecastBudgetLine,
    /// Forecast expense.
    ForecastExpense,
    /// Percentage share of a budget line held by a pole.
    PoleAllocation,
    /// Annual budget envelope of a fiscal year.
    BudgetEnvelope,
}

impl EntityKind {
    /// Human-readable singular name.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::BudgetLine => "budget line",
            Self::Pole => "pole",
            Self::Domain => "domain",
            Self::BudgetType => "budget type",
            Self::Vendor => "vendor",
            Self::Contract => "contract",
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase order",
            Self::ForecastBudgetLine => "forecast budget line",
            Self::ForecastExpense => "forecast expense",
            Self::PoleAllocation => "pole allocation",
            Self::BudgetEnvelope => "budget envelope",
        }
    }

    /// Human-readable plural name.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::BudgetLine => "budget lines",
            Self::Pole => "poles",
            Self::Domain => "domains",
            Self::BudgetType => "budget types",
            Self::Vendor => "vendors",
            Self::Contract => "contracts",
            Self::Invoice => "invoices",
            Self::PurchaseOrder => "purchase orders",
            Self::ForecastBudgetLine => "forecast budget lines",
            Self::ForecastExpense => "forecast expenses",
            Self::PoleAllocation => "pole allocations",
            Self::BudgetEnvelope => "budget envelopes",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}
