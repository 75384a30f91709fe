//! Catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use budgetops_shared::types::{EntityKind, TenantId};

/// Kind of reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Cost-sharing pole.
    Pole,
    /// Budget domain.
    Domain,
    /// Budget type.
    BudgetType,
    /// Vendor.
    Vendor,
}

impl CatalogKind {
    /// Entity kind used in reference reports.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Pole => EntityKind::Pole,
            Self::Domain => EntityKind::Domain,
            Self::BudgetType => EntityKind::BudgetType,
            Self::Vendor => EntityKind::Vendor,
        }
    }

    /// Kinds of records that block deleting an entry of this kind.
    #[must_use]
    pub const fn blocking_kinds(self) -> &'static [EntityKind] {
        match self {
            Self::Pole => &[EntityKind::PoleAllocation, EntityKind::BudgetLine],
            Self::Domain | Self::BudgetType => {
                &[EntityKind::BudgetLine, EntityKind::ForecastBudgetLine]
            }
            Self::Vendor => &[
                EntityKind::Contract,
                EntityKind::Invoice,
                EntityKind::PurchaseOrder,
            ],
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.entity_kind().fmt(f)
    }
}

/// A named reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Record ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Kind.
    pub kind: CatalogKind,
    /// Name, unique per tenant and kind.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
