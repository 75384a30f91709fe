//! Budget lines, yearly planned budgets and derived yearly figures.

pub mod error;
pub mod figures;
pub mod service;
pub mod types;
pub mod variance;


pub use error::BudgetError;
pub use figures::YearlyFigures;
pub use service::{BudgetLineRepository, BudgetService};
pub use types::{BudgetLine, CreateBudgetLineInput, Nature, VarianceStatus, YearlyBudget};
pub use variance::LineVariance;
