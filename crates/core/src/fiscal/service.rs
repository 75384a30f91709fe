//! Fiscal year service.

use std::sync::Arc;

use budgetops_shared::types::TenantId;

use super::error::YearError;
use super::year::{
    CreatedYear, YearOccupancy, YearWrite, canonical_years, ensure_plausible_year, plan_year_clone,
};
use crate::forecast::ForecastBudgetLine;

/// Repository trait for fiscal year persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait YearRepository: Send + Sync {
    /// What already occupies a year.
    fn year_occupancy(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> impl std::future::Future<Output = Result<YearOccupancy, YearError>> + Send;

    /// Forecast lines of a year.
    fn year_forecast_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastBudgetLine>, YearError>> + Send;

    /// Re-check occupancy and insert lines in one transaction.
    fn create_year_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
        lines: Vec<ForecastBudgetLine>,
    ) -> impl std::future::Future<Output = Result<YearWrite, YearError>> + Send;

    /// Years that hold forecast lines, envelopes or yearly budgets, in any order.
    fn known_years(
        &self,
        tenant_id: TenantId,
    ) -> impl std::future::Future<Output = Result<Vec<i32>, YearError>> + Send;
}

/// Fiscal year service.
pub struct YearService<R: YearRepository> {
    repo: Arc<R>,
}

impl<R: YearRepository> YearService<R> {
    /// Create a new year service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a fiscal year, optionally cloning the forecast lines of `copy_from`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either year is implausible, or `copy_from == year` (`Validation`)
    /// - The year already holds forecast lines or an envelope (`DuplicateYear`)
    pub async fn create_year(
        &self,
        tenant_id: TenantId,
        year: i32,
        copy_from: Option<i32>,
    ) -> Result<CreatedYear, YearError> {
        ensure_plausible_year(year).map_err(YearError::Validation)?;
        if let Some(source) = copy_from {
            ensure_plausible_year(source).map_err(YearError::Validation)?;
            if source == year {
                return Err(YearError::Validation(format!(
                    "Cannot copy fiscal year {year} onto itself"
                )));
            }
        }

        if self.repo.year_occupancy(tenant_id, year).await?.is_taken() {
            tracing::warn!(tenant_id = %tenant_id, year, "fiscal year already exists");
            return Err(YearError::DuplicateYear(year));
        }

        let lines = match copy_from {
            Some(source) => {
                let source_lines = self.repo.year_forecast_lines(tenant_id, source).await?;
                plan_year_clone(&source_lines, year)
            }
            None => Vec::new(),
        };

        match self.repo.create_year_lines(tenant_id, year, lines).await? {
            YearWrite::Created(lines_created) => {
                tracing::info!(
                    tenant_id = %tenant_id,
                    year,
                    copied_from = ?copy_from,
                    lines_created,
                    "fiscal year created"
                );
                Ok(CreatedYear {
                    year,
                    copied_from: copy_from,
                    lines_created,
                })
            }
            YearWrite::Duplicate => {
                tracing::warn!(tenant_id = %tenant_id, year, "fiscal year created concurrently");
                Err(YearError::DuplicateYear(year))
            }
        }
    }

    /// Known years, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_years(&self, tenant_id: TenantId) -> Result<Vec<i32>, YearError> {
        let years = self.repo.known_years(tenant_id).await?;
        Ok(canonical_years(years))
    }
}
