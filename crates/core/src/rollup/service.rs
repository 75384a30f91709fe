//! Rollup service.

use std::sync::Arc;

use budgetops_shared::types::TenantId;

use super::cockpit::CockpitSummary;
use super::error::RollupError;
use super::pipeline::{RollupAggregator, validate};
use super::record::{TenantSnapshot, build_records};
use super::types::{DataSource, RollupResult, WidgetConfig};
use crate::fiscal::ensure_plausible_year;

/// Repository trait for rollup reads.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait RollupSource: Send + Sync {
    /// Load what the records of `source` need for one tenant.
    ///
    /// Implementations may skip collections the source does not use, but
    /// budget lines, allocations and names are always required.
    fn snapshot(
        &self,
        tenant_id: TenantId,
        source: DataSource,
    ) -> impl std::future::Future<Output = Result<TenantSnapshot, RollupError>> + Send;
}

/// Rollup service.
pub struct RollupService<R: RollupSource> {
    repo: Arc<R>,
    aggregator: RollupAggregator,
}

impl<R: RollupSource> RollupService<R> {
    /// Create a new rollup service.
    #[must_use]
    pub fn new(repo: Arc<R>, aggregator: RollupAggregator) -> Self {
        Self { repo, aggregator }
    }

    /// Run a widget configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the repository fails.
    pub async fn run(
        &self,
        tenant_id: TenantId,
        config: &WidgetConfig,
    ) -> Result<RollupResult, RollupError> {
        if let Err(e) = validate(config) {
            tracing::warn!(tenant_id = %tenant_id, error = %e, "rollup rejected");
            return Err(e);
        }
        let snapshot = self.repo.snapshot(tenant_id, config.source).await?;
        let records = build_records(&snapshot, config.source);
        let result = self.aggregator.run(&records, config);
        match &result {
            Ok(result) => tracing::debug!(
                tenant_id = %tenant_id,
                source = ?config.source,
                group_by = ?config.group_by,
                records = result.record_count,
                buckets = result.buckets.len(),
                truncated = result.truncated,
                "rollup computed"
            ),
            Err(e) => tracing::warn!(tenant_id = %tenant_id, error = %e, "rollup rejected"),
        }
        result
    }

    /// Cockpit KPIs of a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an implausible year, or an error if the
    /// repository fails.
    pub async fn cockpit_summary(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<CockpitSummary, RollupError> {
        ensure_plausible_year(year).map_err(RollupError::Validation)?;
        let snapshot = self
            .repo
            .snapshot(tenant_id, DataSource::BudgetLines)
            .await?;
        let records = build_records(&snapshot, DataSource::BudgetLines);
        CockpitSummary::compute(&self.aggregator, &records, year)
    }
}
