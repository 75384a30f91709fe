//! Budget line service: creation, yearly budgets, figures and guarded deletion.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use budgetops_shared::types::{BudgetLineId, EntityKind, TenantId};

use super::error::BudgetError;
use super::figures::YearlyFigures;
use super::types::{BudgetLine, CreateBudgetLineInput, YearlyBudget};
use super::variance::LineVariance;
use crate::fiscal::ensure_plausible_year;
use crate::integrity::GuardedDelete;
use crate::procurement::{Contract, Invoice};

/// Repository trait for budget line persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BudgetLineRepository: Send + Sync {
    /// Check that a referenced record exists for the tenant.
    fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, BudgetError>> + Send;

    /// Persist a new budget line.
    fn insert_line(
        &self,
        line: BudgetLine,
    ) -> impl std::future::Future<Output = Result<BudgetLine, BudgetError>> + Send;

    /// Find a budget line by ID.
    fn find_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Option<BudgetLine>, BudgetError>> + Send;

    /// List the tenant's budget lines.
    fn list_lines(
        &self,
        tenant_id: TenantId,
    ) -> impl std::future::Future<Output = Result<Vec<BudgetLine>, BudgetError>> + Send;

    /// Insert or replace the planned budget of a (line, year).
    fn upsert_yearly_budget(
        &self,
        tenant_id: TenantId,
        budget: YearlyBudget,
    ) -> impl std::future::Future<Output = Result<YearlyBudget, BudgetError>> + Send;

    /// All planned budgets of a line.
    fn yearly_budgets(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Vec<YearlyBudget>, BudgetError>> + Send;

    /// Contracts linked to a line.
    fn linked_contracts(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Vec<Contract>, BudgetError>> + Send;

    /// Invoices linked to a line.
    fn linked_invoices(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<Vec<Invoice>, BudgetError>> + Send;

    /// Delete a line unless contracts, invoices or purchase orders reference it.
    ///
    /// Counting and deleting happen in one transaction. Allocations and yearly
    /// budgets cascade.
    fn delete_line_guarded(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> impl std::future::Future<Output = Result<GuardedDelete, BudgetError>> + Send;
}

/// Budget line service.
pub struct BudgetService<R: BudgetLineRepository> {
    repo: Arc<R>,
}

impl<R: BudgetLineRepository> BudgetService<R> {
    /// Create a new budget service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a budget line.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty label and `InvalidReference` when the
    /// budget type, domain or pole does not exist.
    pub async fn create_budget_line(
        &self,
        tenant_id: TenantId,
        input: CreateBudgetLineInput,
    ) -> Result<BudgetLine, BudgetError> {
        let label = input.label.trim();
        if label.is_empty() {
            return Err(BudgetError::validation("Budget line label cannot be empty"));
        }

        let references = [
            (EntityKind::BudgetType, input.budget_type_id.map(|id| id.0)),
            (EntityKind::Domain, input.domain_id.map(|id| id.0)),
            (EntityKind::Pole, input.pole_id.map(|id| id.0)),
        ];
        for (kind, id) in references {
            let Some(id) = id else { continue };
            if !self.repo.reference_exists(tenant_id, kind, id).await? {
                tracing::warn!(tenant_id = %tenant_id, %kind, %id, "budget line reference missing");
                return Err(BudgetError::InvalidReference { kind, id });
            }
        }

        let now = Utc::now();
        let line = BudgetLine {
            id: BudgetLineId::new(),
            tenant_id,
            label: label.to_string(),
            nature: input.nature,
            budget_type_id: input.budget_type_id,
            domain_id: input.domain_id,
            accounting_code: input
                .accounting_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            pole_id: input.pole_id,
            created_at: now,
            updated_at: now,
        };
        let line = self.repo.insert_line(line).await?;
        tracing::info!(tenant_id = %tenant_id, budget_line_id = %line.id, "budget line created");
        Ok(line)
    }

    /// Get a budget line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn get_budget_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<BudgetLine, BudgetError> {
        self.repo
            .find_line(tenant_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// List budget lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_budget_lines(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<BudgetLine>, BudgetError> {
        self.repo.list_lines(tenant_id).await
    }

    /// Set the planned budget of a line for a year, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist and `Validation` for an
    /// implausible year.
    pub async fn set_yearly_budget(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        year: i32,
        amount: Decimal,
    ) -> Result<YearlyBudget, BudgetError> {
        ensure_plausible_year(year).map_err(BudgetError::Validation)?;
        self.get_budget_line(tenant_id, id).await?;

        let budget = self
            .repo
            .upsert_yearly_budget(
                tenant_id,
                YearlyBudget {
                    budget_line_id: id,
                    year,
                    amount,
                },
            )
            .await?;
        tracing::debug!(
            tenant_id = %tenant_id,
            budget_line_id = %id,
            year,
            %amount,
            "yearly budget set"
        );
        Ok(budget)
    }

    /// Figures of a line for one year.
    ///
    /// A year without a planned budget reports a budget of zero.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn yearly_figures(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        year: i32,
    ) -> Result<YearlyFigures, BudgetError> {
        self.get_budget_line(tenant_id, id).await?;
        let budgets = self.repo.yearly_budgets(tenant_id, id).await?;
        let contracts = self.repo.linked_contracts(tenant_id, id).await?;
        let invoices = self.repo.linked_invoices(tenant_id, id).await?;

        let budget = budgets
            .iter()
            .find(|b| b.year == year)
            .map_or(Decimal::ZERO, |b| b.amount);
        Ok(YearlyFigures::derive(year, budget, &contracts, &invoices))
    }

    /// Figures of a line for every known year, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist.
    pub async fn figures_history(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<YearlyFigures>, BudgetError> {
        self.get_budget_line(tenant_id, id).await?;
        let budgets = self.repo.yearly_budgets(tenant_id, id).await?;
        let contracts = self.repo.linked_contracts(tenant_id, id).await?;
        let invoices = self.repo.linked_invoices(tenant_id, id).await?;
        Ok(YearlyFigures::history(&budgets, &contracts, &invoices))
    }

    /// Variance of a line-year.
    #[must_use]
    pub fn line_variance(figures: &YearlyFigures) -> LineVariance {
        LineVariance::calculate(figures)
    }

    /// Delete a budget line.
    ///
    /// # Errors
    ///
    /// Returns `ReferentialIntegrity` with the blocking counts while contracts,
    /// invoices or purchase orders reference the line, `NotFound` if it does
    /// not exist.
    pub async fn delete_budget_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<(), BudgetError> {
        match self.repo.delete_line_guarded(tenant_id, id).await? {
            GuardedDelete::Deleted => {
                tracing::info!(tenant_id = %tenant_id, budget_line_id = %id, "budget line deleted");
                Ok(())
            }
            GuardedDelete::NotFound => Err(BudgetError::NotFound(id)),
            GuardedDelete::Blocked(refs) => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    budget_line_id = %id,
                    references = %refs,
                    "budget line deletion refused"
                );
                Err(BudgetError::ReferentialIntegrity(refs))
            }
        }
    }
}
