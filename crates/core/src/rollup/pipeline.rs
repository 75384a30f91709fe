//! Rollup pipeline stages.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use budgetops_shared::config::EngineConfig;

use super::error::RollupError;
use super::record::RollupRecord;
use super::types::{
    Aggregation, Bucket, BucketKey, GroupBy, RollupFilter, RollupResult, SortRule, WidgetConfig,
};
use crate::budget::variance::percent_of;

/// Default label of the reserved bucket.
pub const DEFAULT_OTHER_LABEL: &str = "Other";

/// Default hard cap on returned buckets.
pub const DEFAULT_MAX_BUCKETS: usize = 50;

/// Runs widget configurations over rollup records.
#[derive(Debug, Clone)]
pub struct RollupAggregator {
    other_label: String,
    max_buckets: usize,
}

impl Default for RollupAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_OTHER_LABEL, DEFAULT_MAX_BUCKETS)
    }
}

/// Records sharing a grouping value, before aggregation.
struct Group<'a> {
    key: BucketKey,
    label: String,
    records: Vec<&'a RollupRecord>,
}

impl RollupAggregator {
    /// Create an aggregator. A zero cap is raised to one bucket.
    #[must_use]
    pub fn new(other_label: impl Into<String>, max_buckets: usize) -> Self {
        Self {
            other_label: other_label.into(),
            max_buckets: max_buckets.max(1),
        }
    }

    /// Create an aggregator from engine settings.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.other_bucket_label.clone(), config.rollup_max_buckets)
    }

    /// Label of the reserved bucket.
    #[must_use]
    pub fn other_label(&self) -> &str {
        &self.other_label
    }

    /// Same aggregator without the bucket cap, for fixed internal views
    /// whose bucket set is bounded by construction.
    #[must_use]
    pub fn uncapped(&self) -> Self {
        Self {
            other_label: self.other_label.clone(),
            max_buckets: usize::MAX,
        }
    }

    /// Hard cap on returned buckets.
    #[must_use]
    pub fn max_buckets(&self) -> usize {
        self.max_buckets
    }

    /// Run a widget over records of its source.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the configuration has no metric, a metric
    /// the source does not carry or a zero limit, and `InvalidDateRange`
    /// when the range start is after its end.
    pub fn run(
        &self,
        records: &[RollupRecord],
        config: &WidgetConfig,
    ) -> Result<RollupResult, RollupError> {
        validate(config)?;

        let filtered: Vec<&RollupRecord> = records
            .iter()
            .filter(|record| within_period(record, &config.filter))
            .filter(|record| matches_fields(record, &config.filter))
            .collect();

        let groups = self.group(&filtered, config.group_by);
        let mut buckets: Vec<Bucket> = groups
            .into_iter()
            .map(|group| aggregate(group, config))
            .collect();

        let total: Decimal = buckets.iter().map(Bucket::primary_value).sum();
        for bucket in &mut buckets {
            bucket.share = percent_of(bucket.primary_value(), total);
        }

        sort_buckets(&mut buckets, config.sort);

        let bucket_count = buckets.len();
        let limit = config
            .limit
            .map_or(self.max_buckets, |limit| limit.min(self.max_buckets));
        buckets.truncate(limit);

        Ok(RollupResult {
            source: config.source,
            group_by: config.group_by,
            metrics: config.metrics.clone(),
            aggregation: config.aggregation,
            buckets,
            record_count: filtered.len() as u64,
            bucket_count,
            truncated: bucket_count > limit,
        })
    }

    fn group<'a>(&self, records: &[&'a RollupRecord], group_by: GroupBy) -> Vec<Group<'a>> {
        let mut groups: Vec<Group<'a>> = Vec::new();
        let mut index: HashMap<BucketKey, usize> = HashMap::new();
        for &record in records {
            let (key, label) = match group_value(record, group_by) {
                Some((value, label)) => (BucketKey::Value(value), label),
                None => (BucketKey::Other, self.other_label.clone()),
            };
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    label,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(record);
        }
        groups
    }
}

pub(crate) fn validate(config: &WidgetConfig) -> Result<(), RollupError> {
    if config.metrics.is_empty() {
        return Err(RollupError::validation("At least one metric is required"));
    }
    if let Some(metric) = config
        .metrics
        .iter()
        .find(|metric| !metric.supported_by(config.source))
    {
        return Err(RollupError::validation(format!(
            "Metric {metric:?} is not available for source {:?}",
            config.source
        )));
    }
    if config.limit == Some(0) {
        return Err(RollupError::validation("Limit must be at least 1"));
    }
    if let (Some(start), Some(end)) = (config.filter.date_from, config.filter.date_to)
        && start > end
    {
        return Err(RollupError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Year and date range filter.
///
/// Dated records must fall inside the range. Undated records with a year are
/// kept when that year overlaps the range.
fn within_period(record: &RollupRecord, filter: &RollupFilter) -> bool {
    if let Some(year) = filter.year
        && record.effective_year() != Some(year)
    {
        return false;
    }
    if filter.date_from.is_none() && filter.date_to.is_none() {
        return true;
    }
    if let Some(date) = record.date {
        return filter.date_from.is_none_or(|from| date >= from)
            && filter.date_to.is_none_or(|to| date <= to);
    }
    match record.year {
        Some(year) => {
            filter.date_from.is_none_or(|from| year >= from.year())
                && filter.date_to.is_none_or(|to| year <= to.year())
        }
        None => false,
    }
}

fn matches_fields(record: &RollupRecord, filter: &RollupFilter) -> bool {
    if let Some(status) = &filter.status
        && record.status.as_deref() != Some(status.as_str())
    {
        return false;
    }
    if let Some(vendor) = filter.vendor_id
        && record.vendor.as_ref().map(|v| v.id) != Some(vendor)
    {
        return false;
    }
    if let Some(domain) = filter.domain_id
        && record.domain.as_ref().map(|d| d.id) != Some(domain)
    {
        return false;
    }
    if let Some(budget_type) = filter.budget_type_id
        && record.budget_type.as_ref().map(|t| t.id) != Some(budget_type)
    {
        return false;
    }
    if let Some(nature) = filter.nature
        && record.nature != Some(nature)
    {
        return false;
    }
    if let Some(pole) = filter.pole_id
        && !record.ownership.includes(pole)
    {
        return false;
    }
    true
}

/// Grouping value and display label, `None` when the record lacks the dimension.
fn group_value(record: &RollupRecord, group_by: GroupBy) -> Option<(String, String)> {
    match group_by {
        GroupBy::Domain => record
            .domain
            .as_ref()
            .map(|d| (d.id.to_string(), d.name.clone())),
        GroupBy::BudgetType => record
            .budget_type
            .as_ref()
            .map(|t| (t.id.to_string(), t.name.clone())),
        GroupBy::Vendor => record
            .vendor
            .as_ref()
            .map(|v| (v.id.to_string(), v.name.clone())),
        GroupBy::Pole => record
            .pole
            .as_ref()
            .map(|p| (p.id.to_string(), p.name.clone())),
        GroupBy::Nature => record
            .nature
            .map(|n| (n.as_str().to_string(), n.as_str().to_string())),
        GroupBy::Status => record.status.clone().map(|s| (s.clone(), s)),
        GroupBy::Month => record.date.map(|d| {
            let key = format!("{}-{:02}", d.year(), d.month());
            (key.clone(), key)
        }),
        GroupBy::Quarter => record.date.map(|d| {
            let key = format!("{}-Q{}", d.year(), d.month0() / 3 + 1);
            (key.clone(), key)
        }),
        GroupBy::Year => record.effective_year().map(|y| {
            let key = y.to_string();
            (key.clone(), key)
        }),
    }
}

fn aggregate(group: Group<'_>, config: &WidgetConfig) -> Bucket {
    let count = group.records.len() as u64;
    let values = config
        .metrics
        .iter()
        .map(|&metric| {
            let mut values = group.records.iter().map(|record| record.value(metric));
            match config.aggregation {
                Aggregation::Sum => values.sum(),
                Aggregation::Average => {
                    let sum: Decimal = values.sum();
                    if count == 0 {
                        Decimal::ZERO
                    } else {
                        (sum / Decimal::from(count)).round_dp(2)
                    }
                }
                Aggregation::Count => Decimal::from(count),
                Aggregation::Min => values
                    .next()
                    .map_or(Decimal::ZERO, |first| values.fold(first, Decimal::min)),
                Aggregation::Max => values
                    .next()
                    .map_or(Decimal::ZERO, |first| values.fold(first, Decimal::max)),
            }
        })
        .collect();

    Bucket {
        key: group.key,
        label: group.label,
        count,
        values,
        share: Decimal::ZERO,
    }
}

/// Stable sort. Name rules keep the reserved bucket last.
fn sort_buckets(buckets: &mut [Bucket], rule: SortRule) {
    let other_last = |a: &Bucket, b: &Bucket| a.key.is_other().cmp(&b.key.is_other());
    match rule {
        SortRule::None => {}
        SortRule::NameAsc => {
            buckets.sort_by(|a, b| other_last(a, b).then_with(|| a.label.cmp(&b.label)));
        }
        SortRule::NameDesc => {
            buckets.sort_by(|a, b| other_last(a, b).then_with(|| b.label.cmp(&a.label)));
        }
        SortRule::ValueAsc => buckets.sort_by(|a, b| a.primary_value().cmp(&b.primary_value())),
        SortRule::ValueDesc => buckets.sort_by(|a, b| b.primary_value().cmp(&a.primary_value())),
    }
}
