//! Contracts, invoices and purchase orders.
//!
//! These are the linked documents from which engaged and invoiced figures are
//! derived. Creation is used by the import collaborator with resolved identifiers.

pub mod error;
pub mod service;
pub mod types;

pub use error::ProcurementError;
pub use service::{ProcurementRepository, ProcurementService};
pub use types::{
    Contract, ContractStatus, CreateContractInput, CreateInvoiceInput, CreatePurchaseOrderInput,
    Invoice, InvoiceStatus, PurchaseOrder,
};
