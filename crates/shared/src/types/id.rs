//! Typed IDs for type-safe entity references.
//!
//! Every entity is addressed by `(TenantId, <Entity>Id)`. Using typed IDs prevents
//! accidentally passing a `PoleId` where a `BudgetLineId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant (organization).");
typed_id!(BudgetLineId, "Unique identifier for a budget line.");
typed_id!(PoleId, "Unique identifier for a cost-sharing pole.");
typed_id!(DomainId, "Unique identifier for a budget domain.");
typed_id!(BudgetTypeId, "Unique identifier for a budget type.");
typed_id!(VendorId, "Unique identifier for a vendor.");
typed_id!(ContractId, "Unique identifier for a contract.");
typed_id!(InvoiceId, "Unique identifier for an invoice.");
typed_id!(PurchaseOrderId, "Unique identifier for a purchase order.");
typed_id!(
    ForecastBudgetLineId,
    "Unique identifier for a forecast budget line."
);
typed_id!(ForecastExpenseId, "Unique identifier for a forecast expense.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
