//! Budget aggregation and reconciliation engine for Budgetops.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through repository traits that the db crate implements.
//!
//! # Modules
//!
//! - `budget` - Budget lines and derived yearly figures
//! - `allocation` - Percentage split of budget lines across poles
//! - `forecast` - Forecast expenses reconciled against purchase orders and invoices
//! - `rollup` - Filter, group, aggregate, sort and limit pipeline for analytical views
//! - `fiscal` - Fiscal year creation and canonical year ordering
//! - `catalog` - Poles, domains, budget types and vendors
//! - `procurement` - Contracts, invoices and purchase orders
//! - `integrity` - Blocking-reference reports for guarded deletions

pub mod allocation;
pub mod budget;
pub mod catalog;
pub mod fiscal;
pub mod forecast;
pub mod integrity;
pub mod procurement;
pub mod rollup;

#[cfg(test)]
mod test_support;
