//! Fiscal year lifecycle.
//!
//! A fiscal year exists once it holds forecast lines or an envelope. Creating
//! a year can clone the forecast structure of a previous one.

pub mod error;
pub mod service;
pub mod year;

pub use error::YearError;
pub use service::{YearRepository, YearService};
pub use year::{
    CreatedYear, MAX_YEAR, MIN_YEAR, YearOccupancy, YearWrite, canonical_years,
    ensure_plausible_year, plan_year_clone,
};
