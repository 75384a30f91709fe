//! `SeaORM` entity definitions.
//!
//! One module per table; the schema lives in the initial migration.

#![allow(missing_docs)]

pub mod budget_envelopes;
pub mod budget_lines;
pub mod catalog_entries;
pub mod contracts;
pub mod forecast_budget_lines;
pub mod forecast_expense_invoices;
pub mod forecast_expense_purchase_orders;
pub mod forecast_expenses;
pub mod invoices;
pub mod pole_allocations;
pub mod purchase_orders;
pub mod yearly_budgets;
