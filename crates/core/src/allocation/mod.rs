//! Percentage split of budget lines across cost-sharing poles.
//!
//! A line is owned by nobody, by a single pole, or shared by several poles
//! whose percentages sum to 100. Splits never change the line's figures;
//! [`split_figures`] only apportions them.

pub mod error;
pub mod service;
pub mod split;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::AllocationError;
pub use service::{AllocationRepository, AllocationService};
pub use split::{LargestRemainder, split_figures};
pub use types::{Ownership, PoleAllocation, PoleFigures};
