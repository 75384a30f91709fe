//! Cockpit KPIs for one fiscal year.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::RollupError;
use super::pipeline::RollupAggregator;
use super::record::RollupRecord;
use super::types::{Aggregation, DataSource, GroupBy, Metric, RollupFilter, SortRule, WidgetConfig};
use crate::budget::Nature;
use crate::budget::variance::percent_of;

/// Headline figures of one nature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatureKpi {
    /// Nature.
    pub nature: Nature,
    /// Planned budget.
    pub budget: Decimal,
    /// Engaged amount.
    pub engaged: Decimal,
    /// Invoiced amount.
    pub invoiced: Decimal,
    /// `budget - engaged`.
    pub remaining: Decimal,
    /// Engaged as a percentage of budget.
    pub engagement_rate: Decimal,
}

/// Headline figures of a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CockpitSummary {
    /// Fiscal year.
    pub year: i32,
    /// Planned budget.
    pub budget: Decimal,
    /// Engaged amount.
    pub engaged: Decimal,
    /// Invoiced amount.
    pub invoiced: Decimal,
    /// `budget - engaged`.
    pub remaining: Decimal,
    /// Engaged as a percentage of budget.
    pub engagement_rate: Decimal,
    /// Invoiced as a percentage of engaged.
    pub invoicing_rate: Decimal,
    /// Budget line-years counted.
    pub record_count: u64,
    /// Both natures, zero-filled.
    pub by_nature: Vec<NatureKpi>,
}

impl CockpitSummary {
    /// Widget configuration the cockpit runs.
    #[must_use]
    pub fn widget(year: i32) -> WidgetConfig {
        WidgetConfig {
            source: DataSource::BudgetLines,
            group_by: GroupBy::Nature,
            metrics: vec![
                Metric::Budget,
                Metric::Engaged,
                Metric::Invoiced,
                Metric::Remaining,
            ],
            aggregation: Aggregation::Sum,
            sort: SortRule::None,
            limit: None,
            filter: RollupFilter {
                year: Some(year),
                ..RollupFilter::default()
            },
        }
    }

    /// Compute the summary from budget line-year records.
    ///
    /// Every nature is counted whatever the bucket cap of `aggregator`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline rejects the configuration.
    pub fn compute(
        aggregator: &RollupAggregator,
        records: &[RollupRecord],
        year: i32,
    ) -> Result<Self, RollupError> {
        let result = aggregator.uncapped().run(records, &Self::widget(year))?;

        let by_nature: Vec<NatureKpi> = Nature::ALL
            .iter()
            .map(|&nature| {
                let values = result
                    .bucket(nature.as_str())
                    .map(|bucket| bucket.values.clone())
                    .unwrap_or_default();
                let at = |i: usize| values.get(i).copied().unwrap_or_default();
                NatureKpi {
                    nature,
                    budget: at(0),
                    engaged: at(1),
                    invoiced: at(2),
                    remaining: at(3),
                    engagement_rate: percent_of(at(1), at(0)),
                }
            })
            .collect();

        let budget: Decimal = by_nature.iter().map(|k| k.budget).sum();
        let engaged: Decimal = by_nature.iter().map(|k| k.engaged).sum();
        let invoiced: Decimal = by_nature.iter().map(|k| k.invoiced).sum();

        Ok(Self {
            year,
            budget,
            engaged,
            invoiced,
            remaining: budget - engaged,
            engagement_rate: percent_of(engaged, budget),
            invoicing_rate: percent_of(invoiced, engaged),
            record_count: result.record_count,
            by_nature,
        })
    }
}
