//! Repository implementations for database access.

pub mod allocation;
pub mod budget;
pub mod catalog;
pub mod fiscal;
pub mod forecast;
pub mod procurement;
pub mod rollup;

mod convert;
mod lookup;

pub use allocation::AllocationRepository;
pub use budget::BudgetLineRepository;
pub use catalog::CatalogRepository;
pub use fiscal::YearRepository;
pub use forecast::ForecastRepository;
pub use procurement::ProcurementRepository;
pub use rollup::RollupRepository;
