//! Reference data: poles, domains, budget types and vendors.

pub mod error;
pub mod service;
pub mod types;

pub use error::CatalogError;
pub use service::{CatalogRepository, CatalogService};
pub use types::{CatalogEntry, CatalogKind};
