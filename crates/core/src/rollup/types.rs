//! Widget configuration and rollup results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetops_shared::types::{BudgetTypeId, DomainId, PoleId, VendorId};

use crate::budget::Nature;

/// Records a rollup runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// One record per (budget line, year).
    BudgetLines,
    /// One record per invoice.
    Invoices,
    /// One record per contract.
    Contracts,
}

/// Dimension records are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Domain name.
    Domain,
    /// Budget type name.
    BudgetType,
    /// Nature.
    Nature,
    /// Document status.
    Status,
    /// Vendor name.
    Vendor,
    /// Owning pole; shared lines go to their largest share.
    Pole,
    /// Calendar month of the record date, `2025-03`.
    Month,
    /// Calendar quarter of the record date, `2025-Q1`.
    Quarter,
    /// Year of the record.
    Year,
}

/// Numeric field aggregated per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Planned budget.
    Budget,
    /// Engaged amount.
    Engaged,
    /// Invoiced amount.
    Invoiced,
    /// `budget - engaged`.
    Remaining,
    /// Document amount. For budget line-years, the planned budget.
    Amount,
}

impl Metric {
    /// Returns true if records of `source` carry this metric.
    #[must_use]
    pub fn supported_by(self, source: DataSource) -> bool {
        match source {
            DataSource::BudgetLines => true,
            DataSource::Invoices => matches!(self, Self::Amount | Self::Invoiced),
            DataSource::Contracts => matches!(self, Self::Amount | Self::Engaged),
        }
    }
}

/// Per-bucket aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of values.
    #[default]
    Sum,
    /// Mean of values, rounded to 2 dp.
    Average,
    /// Number of records; metric values are ignored.
    Count,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

/// Bucket ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortRule {
    /// Discovery order.
    #[default]
    None,
    /// Label ascending, reserved bucket last.
    NameAsc,
    /// Label descending, reserved bucket last.
    NameDesc,
    /// First metric ascending, stable on ties.
    ValueAsc,
    /// First metric descending, stable on ties.
    ValueDesc,
}

/// Pre-filters. Unset fields match everything; set fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupFilter {
    /// Start of the date range, inclusive.
    pub date_from: Option<NaiveDate>,
    /// End of the date range, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Record year.
    pub year: Option<i32>,
    /// Document status.
    pub status: Option<String>,
    /// Vendor.
    pub vendor_id: Option<VendorId>,
    /// Domain.
    pub domain_id: Option<DomainId>,
    /// Budget type.
    pub budget_type_id: Option<BudgetTypeId>,
    /// Nature.
    pub nature: Option<Nature>,
    /// Pole holding any share of the record's budget line.
    pub pole_id: Option<PoleId>,
}

/// Configuration of an analytical view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Records to run over.
    pub source: DataSource,
    /// Grouping dimension.
    pub group_by: GroupBy,
    /// Metrics, at least one. The first drives value sorting and shares.
    pub metrics: Vec<Metric>,
    /// Aggregation.
    #[serde(default)]
    pub aggregation: Aggregation,
    /// Sort rule.
    #[serde(default)]
    pub sort: SortRule,
    /// Top-N limit, capped by the configured maximum.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Pre-filters.
    #[serde(default)]
    pub filter: RollupFilter,
}

/// Identity of a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BucketKey {
    /// Records sharing a grouping value.
    Value(String),
    /// Records missing the grouping value.
    Other,
}

impl BucketKey {
    /// Returns true for the reserved bucket.
    #[must_use]
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other)
    }
}

/// One group of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Identity.
    pub key: BucketKey,
    /// Display label.
    pub label: String,
    /// Number of records.
    pub count: u64,
    /// One aggregated value per configured metric.
    pub values: Vec<Decimal>,
    /// First metric as a percentage of all buckets' first metric, 2 dp.
    pub share: Decimal,
}

impl Bucket {
    /// Value of the first metric.
    #[must_use]
    pub fn primary_value(&self) -> Decimal {
        self.values.first().copied().unwrap_or_default()
    }
}

/// Output of a rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupResult {
    /// Source.
    pub source: DataSource,
    /// Grouping dimension.
    pub group_by: GroupBy,
    /// Metrics, in value order.
    pub metrics: Vec<Metric>,
    /// Aggregation.
    pub aggregation: Aggregation,
    /// Buckets after sort and limit.
    pub buckets: Vec<Bucket>,
    /// Records left after pre-filtering.
    pub record_count: u64,
    /// Buckets before the limit.
    pub bucket_count: usize,
    /// Whether the limit dropped buckets.
    pub truncated: bool,
}

impl RollupResult {
    /// Returns true when no record survived filtering.
    ///
    /// Buckets whose values are all zero still count as data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finds a bucket by label.
    #[must_use]
    pub fn bucket(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.label == label)
    }
}
