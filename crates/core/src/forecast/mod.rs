//! Forecast expenses reconciled against purchase orders and invoices.
//!
//! A forecast expense is planned under a forecast budget line. Linked purchase
//! orders make it engaged, linked invoices make it realized. A realized expense
//! is locked: it can still gain links but can no longer be edited or deleted.

pub mod error;
pub mod service;
pub mod totals;
pub mod types;


pub use error::ForecastError;
pub use service::{ForecastRepository, ForecastService};
pub use totals::{
    EnvelopeComparison, EnvelopeUsage, ExpenseTotals, ForecastLineTotals, ForecastRollup,
    NatureTotals, ReconciliationStatus, ReconciliationTotals,
};
pub use types::{
    AnnualBudgetEnvelope, BulkFailure, BulkOutcome, CreateExpenseInput, CreateForecastLineInput,
    ExpensePatch, ExpenseWrite, ForecastBudgetLine, ForecastExpense, UpdateExpenseInput,
};
