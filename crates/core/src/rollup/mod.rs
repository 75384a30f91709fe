//! Filter, group, aggregate, sort and limit pipeline for analytical views.
//!
//! Reporting widgets describe what they want with a [`WidgetConfig`]. The
//! pipeline runs over records built from a tenant snapshot:
//!
//! 1. Source selection (budget line-years, invoices or contracts)
//! 2. Pre-filter (date range and year first, then field filters)
//! 3. Group-by, with a reserved bucket for records missing the dimension
//! 4. Aggregate per bucket and metric
//! 5. Sort
//! 6. Limit
//!
//! The cockpit KPIs are a fixed configuration of the same pipeline.

pub mod cockpit;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use cockpit::{CockpitSummary, NatureKpi};
pub use error::RollupError;
pub use pipeline::RollupAggregator;
pub use record::{Labelled, RollupRecord, TenantSnapshot, build_records};
pub use service::{RollupService, RollupSource};
pub use types::{
    Aggregation, Bucket, BucketKey, DataSource, GroupBy, Metric, RollupFilter, RollupResult,
    SortRule, WidgetConfig,
};
