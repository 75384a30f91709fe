//! Pole allocation service.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use budgetops_shared::types::{BudgetLineId, EntityKind, PoleId, TenantId};

use super::error::AllocationError;
use super::split::split_figures;
use super::types::{Ownership, PoleAllocation, PoleFigures};
use crate::budget::{BudgetLine, YearlyFigures};

/// Default tolerance on the percentage sum.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Repository trait for pole allocation persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AllocationRepository: Send + Sync {
    /// Find the budget line the allocations belong to.
    fn allocation_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Option<BudgetLine>, AllocationError>> + Send;

    /// Return the poles among `poles` that do not exist for the tenant.
    fn missing_poles(
        &self,
        tenant_id: TenantId,
        poles: Vec<PoleId>,
    ) -> impl std::future::Future<Output = Result<Vec<PoleId>, AllocationError>> + Send;

    /// Replace the whole allocation set of a line in one transaction.
    fn replace_allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        allocations: Vec<PoleAllocation>,
    ) -> impl std::future::Future<Output = Result<(), AllocationError>> + Send;

    /// Current allocation set of a line, empty when none.
    fn allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Vec<PoleAllocation>, AllocationError>> + Send;
}

/// Checks an allocation set without touching storage.
///
/// Order: each percentage in `[0, 100]`, no repeated pole, sum within
/// `tolerance` of 100. An empty set is valid.
///
/// # Errors
///
/// Returns `OutOfRange`, `Validation` or `AllocationMismatch`.
pub fn validate_allocations(
    allocations: &[PoleAllocation],
    tolerance: Decimal,
) -> Result<(), AllocationError> {
    if allocations.is_empty() {
        return Ok(());
    }

    for allocation in allocations {
        if allocation.percentage < Decimal::ZERO || allocation.percentage > Decimal::ONE_HUNDRED {
            return Err(AllocationError::OutOfRange {
                pole_id: allocation.pole_id,
                percentage: allocation.percentage,
            });
        }
    }

    let mut seen = HashSet::with_capacity(allocations.len());
    for allocation in allocations {
        if !seen.insert(allocation.pole_id) {
            return Err(AllocationError::Validation(format!(
                "Pole {} appears more than once",
                allocation.pole_id
            )));
        }
    }

    let actual: Decimal = allocations.iter().map(|a| a.percentage).sum();
    if (actual - Decimal::ONE_HUNDRED).abs() > tolerance {
        return Err(AllocationError::AllocationMismatch { actual });
    }

    Ok(())
}

/// Pole allocation service.
pub struct AllocationService<R: AllocationRepository> {
    repo: Arc<R>,
    tolerance: Decimal,
}

impl<R: AllocationRepository> AllocationService<R> {
    /// Create a new allocation service with the default tolerance.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Override the tolerance on the percentage sum.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Replace the allocation set of a budget line.
    ///
    /// An empty set clears the split; the line falls back to its single pole
    /// or becomes unassigned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The budget line or a pole does not exist (`InvalidReference`)
    /// - A percentage is outside `[0, 100]` (`OutOfRange`)
    /// - A pole appears twice (`Validation`)
    /// - The percentages do not sum to 100 (`AllocationMismatch`)
    pub async fn set_allocations(
        &self,
        tenant_id: TenantId,
        budget_line_id: BudgetLineId,
        allocations: Vec<PoleAllocation>,
    ) -> Result<Vec<PoleAllocation>, AllocationError> {
        if self
            .repo
            .allocation_line(tenant_id, budget_line_id)
            .await?
            .is_none()
        {
            return Err(AllocationError::InvalidReference {
                kind: EntityKind::BudgetLine,
                id: budget_line_id.0,
            });
        }

        if let Err(e) = validate_allocations(&allocations, self.tolerance) {
            tracing::warn!(
                tenant_id = %tenant_id,
                budget_line_id = %budget_line_id,
                error = %e,
                "allocation set rejected"
            );
            return Err(e);
        }

        if !allocations.is_empty() {
            let poles = allocations.iter().map(|a| a.pole_id).collect();
            let missing = self.repo.missing_poles(tenant_id, poles).await?;
            if let Some(pole_id) = missing.first() {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    pole_id = %pole_id,
                    "allocation references unknown pole"
                );
                return Err(AllocationError::InvalidReference {
                    kind: EntityKind::Pole,
                    id: pole_id.0,
                });
            }
        }

        self.repo
            .replace_allocations(tenant_id, budget_line_id, allocations.clone())
            .await?;
        tracing::info!(
            tenant_id = %tenant_id,
            budget_line_id = %budget_line_id,
            poles = allocations.len(),
            "allocations replaced"
        );
        Ok(allocations)
    }

    /// Current allocation set of a line, empty when the line is not split.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the line does not exist.
    pub async fn get_allocations(
        &self,
        tenant_id: TenantId,
        budget_line_id: BudgetLineId,
    ) -> Result<Vec<PoleAllocation>, AllocationError> {
        self.ownership_parts(tenant_id, budget_line_id)
            .await
            .map(|(_, allocations)| allocations)
    }

    /// Resolved ownership of a line.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the line does not exist.
    pub async fn ownership(
        &self,
        tenant_id: TenantId,
        budget_line_id: BudgetLineId,
    ) -> Result<Ownership, AllocationError> {
        let (line, allocations) = self.ownership_parts(tenant_id, budget_line_id).await?;
        Ok(Ownership::from_legacy(line.pole_id, allocations))
    }

    /// Apportions a line's figures across its poles.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the line does not exist.
    pub async fn pole_breakdown(
        &self,
        tenant_id: TenantId,
        budget_line_id: BudgetLineId,
        figures: &YearlyFigures,
    ) -> Result<Vec<PoleFigures>, AllocationError> {
        let ownership = self.ownership(tenant_id, budget_line_id).await?;
        Ok(split_figures(figures, &ownership))
    }

    async fn ownership_parts(
        &self,
        tenant_id: TenantId,
        budget_line_id: BudgetLineId,
    ) -> Result<(BudgetLine, Vec<PoleAllocation>), AllocationError> {
        let line = self
            .repo
            .allocation_line(tenant_id, budget_line_id)
            .await?
            .ok_or(AllocationError::InvalidReference {
                kind: EntityKind::BudgetLine,
                id: budget_line_id.0,
            })?;
        let allocations = self.repo.allocations(tenant_id, budget_line_id).await?;
        Ok((line, allocations))
    }
}
