//! Budget data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetops_shared::types::{BudgetLineId, BudgetTypeId, DomainId, PoleId, TenantId};

/// Spending nature of a budget or forecast line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    /// Operating expenditure.
    Functioning,
    /// Capital expenditure.
    Investment,
}

impl Nature {
    /// Both natures, in reporting order.
    pub const ALL: [Self; 2] = [Self::Functioning, Self::Investment];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Functioning => "functioning",
            Self::Investment => "investment",
        }
    }
}

impl std::fmt::Display for Nature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A budget line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Budget line ID.
    pub id: BudgetLineId,
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
    /// Optional accounting code.
    pub accounting_code: Option<String>,
    /// Single owning pole, used when the line has no multi-pole split.
    pub pole_id: Option<PoleId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Planned budget of a line for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyBudget {
    /// Budget line.
    pub budget_line_id: BudgetLineId,
    /// Year.
    pub year: i32,
    /// Planned amount. Not clamped, may be negative.
    pub amount: Decimal,
}

/// Input for creating a budget line.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetLineInput {
    /// Label.
    pub label: String,
    /// Spending nature.
    pub nature: Nature,
    /// Budget type classification.
    pub budget_type_id: Option<BudgetTypeId>,
    /// Domain classification.
    pub domain_id: Option<DomainId>,
    /// Optional accounting code.
    pub accounting_code: Option<String>,
    /// Single owning pole.
    pub pole_id: Option<PoleId>,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Spend below plan.
    Favorable,
    /// Spend above plan.
    Unfavorable,
    /// Spend equals plan.
    OnBudget,
}

impl VarianceStatus {
    /// Classifies a `plan - spend` difference.
    #[must_use]
    pub fn from_headroom(headroom: Decimal) -> Self {
        match headroom.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Self::Favorable,
            std::cmp::Ordering::Less => Self::Unfavorable,
            std::cmp::Ordering::Equal => Self::OnBudget,
        }
    }
}
