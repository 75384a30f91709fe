//! In-memory repository used by service tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use budgetops_shared::types::{
    BudgetLineId, ContractId, EntityKind, ForecastBudgetLineId, ForecastExpenseId, InvoiceId,
    PoleId, PurchaseOrderId, TenantId, VendorId,
};

use crate::allocation::{AllocationError, AllocationRepository, PoleAllocation};
use crate::budget::{BudgetError, BudgetLine, BudgetLineRepository, Nature, YearlyBudget};
use crate::catalog::{CatalogEntry, CatalogError, CatalogKind, CatalogRepository};
use crate::fiscal::{YearError, YearOccupancy, YearRepository, YearWrite};
use crate::forecast::{
    AnnualBudgetEnvelope, ExpensePatch, ExpenseWrite, ForecastBudgetLine, ForecastError,
    ForecastExpense, ForecastRepository,
};
use crate::integrity::{BlockingReferences, GuardedDelete};
use crate::procurement::{
    Contract, ContractStatus, Invoice, InvoiceStatus, ProcurementError, ProcurementRepository,
    PurchaseOrder,
};
use crate::rollup::{DataSource, RollupError, RollupSource, TenantSnapshot};

#[derive(Default)]
struct State {
    lines: Vec<BudgetLine>,
    yearly: Vec<(TenantId, YearlyBudget)>,
    allocations: HashMap<BudgetLineId, Vec<PoleAllocation>>,
    contracts: Vec<Contract>,
    invoices: Vec<Invoice>,
    orders: Vec<PurchaseOrder>,
    catalog: Vec<CatalogEntry>,
    forecast_lines: Vec<ForecastBudgetLine>,
    expenses: Vec<ForecastExpense>,
    envelopes: Vec<AnnualBudgetEnvelope>,
}

impl State {
    fn line(&self, tenant_id: TenantId, id: BudgetLineId) -> Option<&BudgetLine> {
        self.lines
            .iter()
            .find(|l| l.tenant_id == tenant_id && l.id == id)
    }

    fn catalog_has(&self, tenant_id: TenantId, kind: CatalogKind, id: Uuid) -> bool {
        self.catalog
            .iter()
            .any(|e| e.tenant_id == tenant_id && e.kind == kind && e.id == id)
    }

    fn reference_exists(&self, tenant_id: TenantId, kind: EntityKind, id: Uuid) -> bool {
        match kind {
            EntityKind::BudgetLine => self.line(tenant_id, BudgetLineId(id)).is_some(),
            EntityKind::Pole => self.catalog_has(tenant_id, CatalogKind::Pole, id),
            EntityKind::Domain => self.catalog_has(tenant_id, CatalogKind::Domain, id),
            EntityKind::BudgetType => self.catalog_has(tenant_id, CatalogKind::BudgetType, id),
            EntityKind::Vendor => self.catalog_has(tenant_id, CatalogKind::Vendor, id),
            EntityKind::Contract => self
                .contracts
                .iter()
                .any(|c| c.tenant_id == tenant_id && c.id.0 == id),
            EntityKind::Invoice => self
                .invoices
                .iter()
                .any(|i| i.tenant_id == tenant_id && i.id.0 == id),
            EntityKind::PurchaseOrder => self
                .orders
                .iter()
                .any(|o| o.tenant_id == tenant_id && o.id.0 == id),
            EntityKind::ForecastBudgetLine => self
                .forecast_lines
                .iter()
                .any(|l| l.tenant_id == tenant_id && l.id.0 == id),
            EntityKind::ForecastExpense => self
                .expenses
                .iter()
                .any(|e| e.tenant_id == tenant_id && e.id.0 == id),
            EntityKind::PoleAllocation | EntityKind::BudgetEnvelope => false,
        }
    }

    fn catalog_references(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> BlockingReferences {
        let lines = self.lines.iter().filter(|l| l.tenant_id == tenant_id);
        let forecast = self.forecast_lines.iter().filter(|l| l.tenant_id == tenant_id);
        let count = |n: usize| n as u64;
        match kind {
            CatalogKind::Pole => {
                let allocations = self
                    .lines
                    .iter()
                    .filter(|l| l.tenant_id == tenant_id)
                    .filter_map(|l| self.allocations.get(&l.id))
                    .flatten()
                    .filter(|a| a.pole_id.0 == id)
                    .count();
                let legacy = lines.filter(|l| l.pole_id.map(|p| p.0) == Some(id)).count();
                BlockingReferences::new()
                    .with(EntityKind::PoleAllocation, count(allocations))
                    .with(EntityKind::BudgetLine, count(legacy))
            }
            CatalogKind::Domain => BlockingReferences::new()
                .with(
                    EntityKind::BudgetLine,
                    count(lines.filter(|l| l.domain_id.map(|d| d.0) == Some(id)).count()),
                )
                .with(
                    EntityKind::ForecastBudgetLine,
                    count(forecast.filter(|l| l.domain_id.map(|d| d.0) == Some(id)).count()),
                ),
            CatalogKind::BudgetType => BlockingReferences::new()
                .with(
                    EntityKind::BudgetLine,
                    count(lines.filter(|l| l.budget_type_id.map(|t| t.0) == Some(id)).count()),
                )
                .with(
                    EntityKind::ForecastBudgetLine,
                    count(
                        forecast
                            .filter(|l| l.budget_type_id.map(|t| t.0) == Some(id))
                            .count(),
                    ),
                ),
            CatalogKind::Vendor => {
                let vendor = Some(VendorId(id));
                BlockingReferences::new()
                    .with(
                        EntityKind::Contract,
                        count(
                            self.contracts
                                .iter()
                                .filter(|c| c.tenant_id == tenant_id && c.vendor_id == vendor)
                                .count(),
                        ),
                    )
                    .with(
                        EntityKind::Invoice,
                        count(
                            self.invoices
                                .iter()
                                .filter(|i| i.tenant_id == tenant_id && i.vendor_id == vendor)
                                .count(),
                        ),
                    )
                    .with(
                        EntityKind::PurchaseOrder,
                        count(
                            self.orders
                                .iter()
                                .filter(|o| o.tenant_id == tenant_id && o.vendor_id == vendor)
                                .count(),
                        ),
                    )
            }
        }
    }

    fn occupancy(&self, tenant_id: TenantId, year: i32) -> YearOccupancy {
        YearOccupancy {
            forecast_lines: self
                .forecast_lines
                .iter()
                .filter(|l| l.tenant_id == tenant_id && l.year == year)
                .count() as u64,
            has_envelope: self
                .envelopes
                .iter()
                .any(|e| e.tenant_id == tenant_id && e.year == year),
        }
    }
}

/// Thread-safe in-memory store implementing every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    // ------------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------------

    pub fn seed_budget_line(&self, tenant_id: TenantId, label: &str) -> BudgetLineId {
        self.seed_line(tenant_id, label, Nature::Functioning, None)
    }

    pub fn seed_budget_line_of(
        &self,
        tenant_id: TenantId,
        label: &str,
        nature: Nature,
    ) -> BudgetLineId {
        self.seed_line(tenant_id, label, nature, None)
    }

    pub fn seed_budget_line_with_pole(
        &self,
        tenant_id: TenantId,
        label: &str,
        pole_id: Option<PoleId>,
    ) -> BudgetLineId {
        self.seed_line(tenant_id, label, Nature::Functioning, pole_id)
    }

    fn seed_line(
        &self,
        tenant_id: TenantId,
        label: &str,
        nature: Nature,
        pole_id: Option<PoleId>,
    ) -> BudgetLineId {
        let now = Utc::now();
        let line = BudgetLine {
            id: BudgetLineId::new(),
            tenant_id,
            label: label.to_string(),
            nature,
            budget_type_id: None,
            domain_id: None,
            accounting_code: None,
            pole_id,
            created_at: now,
            updated_at: now,
        };
        let id = line.id;
        self.with(|s| s.lines.push(line));
        id
    }

    fn seed_catalog(&self, tenant_id: TenantId, kind: CatalogKind, name: &str) -> Uuid {
        let entry = CatalogEntry {
            id: Uuid::now_v7(),
            tenant_id,
            kind,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let id = entry.id;
        self.with(|s| s.catalog.push(entry));
        id
    }

    pub fn seed_pole(&self, tenant_id: TenantId, name: &str) -> PoleId {
        PoleId(self.seed_catalog(tenant_id, CatalogKind::Pole, name))
    }

    pub fn seed_vendor(&self, tenant_id: TenantId, name: &str) -> VendorId {
        VendorId(self.seed_catalog(tenant_id, CatalogKind::Vendor, name))
    }

    pub fn seed_yearly_budget(
        &self,
        tenant_id: TenantId,
        line: BudgetLineId,
        year: i32,
        amount: Decimal,
    ) {
        self.with(|s| {
            s.yearly.retain(|(t, b)| {
                !(*t == tenant_id && b.budget_line_id == line && b.year == year)
            });
            s.yearly.push((
                tenant_id,
                YearlyBudget {
                    budget_line_id: line,
                    year,
                    amount,
                },
            ));
        });
    }

    fn push_contract(
        &self,
        tenant_id: TenantId,
        budget_line_id: Option<BudgetLineId>,
        vendor_id: Option<VendorId>,
        amount: Decimal,
        start_date: NaiveDate,
    ) -> ContractId {
        let contract = Contract {
            id: ContractId::new(),
            tenant_id,
            budget_line_id,
            vendor_id,
            label: "Contract".to_string(),
            amount,
            start_date,
            end_date: None,
            status: ContractStatus::Active,
            created_at: Utc::now(),
        };
        let id = contract.id;
        self.with(|s| s.contracts.push(contract));
        id
    }

    pub fn seed_contract(
        &self,
        tenant_id: TenantId,
        line: Option<BudgetLineId>,
        amount: Decimal,
        start_date: NaiveDate,
    ) -> ContractId {
        self.push_contract(tenant_id, line, None, amount, start_date)
    }

    pub fn seed_vendor_contract(
        &self,
        tenant_id: TenantId,
        vendor: VendorId,
        amount: Decimal,
        start_date: NaiveDate,
    ) -> ContractId {
        self.push_contract(tenant_id, None, Some(vendor), amount, start_date)
    }

    pub fn seed_invoice(
        &self,
        tenant_id: TenantId,
        line: Option<BudgetLineId>,
        amount: Decimal,
        invoice_date: NaiveDate,
    ) -> InvoiceId {
        let invoice = Invoice {
            id: InvoiceId::new(),
            tenant_id,
            budget_line_id: line,
            contract_id: None,
            vendor_id: None,
            number: "INV".to_string(),
            amount,
            invoice_date,
            status: InvoiceStatus::Pending,
            created_at: Utc::now(),
        };
        let id = invoice.id;
        self.with(|s| s.invoices.push(invoice));
        id
    }

    pub fn seed_purchase_order(&self, tenant_id: TenantId, amount: Decimal) -> PurchaseOrderId {
        let order = PurchaseOrder {
            id: PurchaseOrderId::new(),
            tenant_id,
            budget_line_id: None,
            vendor_id: None,
            number: "PO".to_string(),
            amount,
            order_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: Utc::now(),
        };
        let id = order.id;
        self.with(|s| s.orders.push(order));
        id
    }

    pub fn seed_forecast_line(
        &self,
        tenant_id: TenantId,
        label: &str,
        nature: Nature,
        year: i32,
        budget: Decimal,
    ) -> ForecastBudgetLineId {
        let line = ForecastBudgetLine {
            id: ForecastBudgetLineId::new(),
            tenant_id,
            label: label.to_string(),
            nature,
            budget_type_id: None,
            domain_id: None,
            year,
            budget,
            created_at: Utc::now(),
        };
        let id = line.id;
        self.with(|s| s.forecast_lines.push(line));
        id
    }

    pub fn seed_forecast_expense(
        &self,
        tenant_id: TenantId,
        line: ForecastBudgetLineId,
        amount: Decimal,
    ) -> ForecastExpenseId {
        self.with(|s| {
            let year = s
                .forecast_lines
                .iter()
                .find(|l| l.id == line)
                .map(|l| l.year)
                .unwrap();
            let now = Utc::now();
            let expense = ForecastExpense {
                id: ForecastExpenseId::new(),
                tenant_id,
                forecast_line_id: line,
                label: "Expense".to_string(),
                description: None,
                amount,
                year,
                purchase_order_ids: BTreeSet::new(),
                invoice_ids: BTreeSet::new(),
                created_at: now,
                updated_at: now,
            };
            let id = expense.id;
            s.expenses.push(expense);
            id
        })
    }

    pub fn seed_envelope(
        &self,
        tenant_id: TenantId,
        year: i32,
        functioning: Decimal,
        investment: Decimal,
    ) {
        self.with(|s| {
            s.envelopes.retain(|e| !(e.tenant_id == tenant_id && e.year == year));
            s.envelopes.push(AnnualBudgetEnvelope {
                tenant_id,
                year,
                functioning,
                investment,
            });
        });
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn contract_count(&self) -> usize {
        self.with(|s| s.contracts.len())
    }

    pub fn forecast_lines_of(&self, tenant_id: TenantId, year: i32) -> Vec<ForecastBudgetLine> {
        self.with(|s| {
            s.forecast_lines
                .iter()
                .filter(|l| l.tenant_id == tenant_id && l.year == year)
                .cloned()
                .collect()
        })
    }

    pub fn expense_count_for_year(&self, tenant_id: TenantId, year: i32) -> usize {
        self.with(|s| {
            s.expenses
                .iter()
                .filter(|e| e.tenant_id == tenant_id && e.year == year)
                .count()
        })
    }

    pub fn has_envelope(&self, tenant_id: TenantId, year: i32) -> bool {
        self.with(|s| s.occupancy(tenant_id, year).has_envelope)
    }
}

// ============================================================================
// Budget lines
// ============================================================================

impl BudgetLineRepository for MemoryStore {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, BudgetError> {
        Ok(self.with(|s| s.reference_exists(tenant_id, kind, id)))
    }

    async fn insert_line(&self, line: BudgetLine) -> Result<BudgetLine, BudgetError> {
        self.with(|s| s.lines.push(line.clone()));
        Ok(line)
    }

    async fn find_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Option<BudgetLine>, BudgetError> {
        Ok(self.with(|s| s.line(tenant_id, id).cloned()))
    }

    async fn list_lines(&self, tenant_id: TenantId) -> Result<Vec<BudgetLine>, BudgetError> {
        let mut lines: Vec<BudgetLine> = self.with(|s| {
            s.lines
                .iter()
                .filter(|l| l.tenant_id == tenant_id)
                .cloned()
                .collect()
        });
        lines.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(lines)
    }

    async fn upsert_yearly_budget(
        &self,
        tenant_id: TenantId,
        budget: YearlyBudget,
    ) -> Result<YearlyBudget, BudgetError> {
        self.seed_yearly_budget(tenant_id, budget.budget_line_id, budget.year, budget.amount);
        Ok(budget)
    }

    async fn yearly_budgets(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<YearlyBudget>, BudgetError> {
        Ok(self.with(|s| {
            s.yearly
                .iter()
                .filter(|(t, b)| *t == tenant_id && b.budget_line_id == id)
                .map(|(_, b)| b.clone())
                .collect()
        }))
    }

    async fn linked_contracts(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<Contract>, BudgetError> {
        Ok(self.with(|s| {
            s.contracts
                .iter()
                .filter(|c| c.tenant_id == tenant_id && c.budget_line_id == Some(id))
                .cloned()
                .collect()
        }))
    }

    async fn linked_invoices(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<Invoice>, BudgetError> {
        Ok(self.with(|s| {
            s.invoices
                .iter()
                .filter(|i| i.tenant_id == tenant_id && i.budget_line_id == Some(id))
                .cloned()
                .collect()
        }))
    }

    async fn delete_line_guarded(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<GuardedDelete, BudgetError> {
        Ok(self.with(|s| {
            if s.line(tenant_id, id).is_none() {
                return GuardedDelete::NotFound;
            }
            let line = Some(id);
            let references = BlockingReferences::new()
                .with(
                    EntityKind::Contract,
                    s.contracts.iter().filter(|c| c.budget_line_id == line).count() as u64,
                )
                .with(
                    EntityKind::Invoice,
                    s.invoices.iter().filter(|i| i.budget_line_id == line).count() as u64,
                )
                .with(
                    EntityKind::PurchaseOrder,
                    s.orders.iter().filter(|o| o.budget_line_id == line).count() as u64,
                );
            if !references.is_empty() {
                return GuardedDelete::Blocked(references);
            }
            s.lines.retain(|l| l.id != id);
            s.yearly.retain(|(_, b)| b.budget_line_id != id);
            s.allocations.remove(&id);
            GuardedDelete::Deleted
        }))
    }
}

// ============================================================================
// Allocations
// ============================================================================

impl AllocationRepository for MemoryStore {
    async fn allocation_line(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Option<BudgetLine>, AllocationError> {
        Ok(self.with(|s| s.line(tenant_id, id).cloned()))
    }

    async fn missing_poles(
        &self,
        tenant_id: TenantId,
        poles: Vec<PoleId>,
    ) -> Result<Vec<PoleId>, AllocationError> {
        Ok(self.with(|s| {
            poles
                .into_iter()
                .filter(|p| !s.catalog_has(tenant_id, CatalogKind::Pole, p.0))
                .collect()
        }))
    }

    async fn replace_allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
        allocations: Vec<PoleAllocation>,
    ) -> Result<(), AllocationError> {
        self.with(|s| {
            if s.line(tenant_id, id).is_none() {
                return;
            }
            if allocations.is_empty() {
                s.allocations.remove(&id);
            } else {
                s.allocations.insert(id, allocations);
            }
        });
        Ok(())
    }

    async fn allocations(
        &self,
        tenant_id: TenantId,
        id: BudgetLineId,
    ) -> Result<Vec<PoleAllocation>, AllocationError> {
        Ok(self.with(|s| {
            if s.line(tenant_id, id).is_none() {
                return Vec::new();
            }
            s.allocations.get(&id).cloned().unwrap_or_default()
        }))
    }
}

// ============================================================================
// Procurement
// ============================================================================

impl ProcurementRepository for MemoryStore {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, ProcurementError> {
        Ok(self.with(|s| s.reference_exists(tenant_id, kind, id)))
    }

    async fn insert_contract(&self, contract: Contract) -> Result<Contract, ProcurementError> {
        self.with(|s| s.contracts.push(contract.clone()));
        Ok(contract)
    }

    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, ProcurementError> {
        self.with(|s| s.invoices.push(invoice.clone()));
        Ok(invoice)
    }

    async fn insert_purchase_order(
        &self,
        order: PurchaseOrder,
    ) -> Result<PurchaseOrder, ProcurementError> {
        self.with(|s| s.orders.push(order.clone()));
        Ok(order)
    }
}

// ============================================================================
// Forecast
// ============================================================================

impl ForecastRepository for MemoryStore {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, ForecastError> {
        Ok(self.with(|s| s.reference_exists(tenant_id, kind, id)))
    }

    async fn insert_forecast_line(
        &self,
        line: ForecastBudgetLine,
    ) -> Result<ForecastBudgetLine, ForecastError> {
        self.with(|s| s.forecast_lines.push(line.clone()));
        Ok(line)
    }

    async fn find_forecast_line(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<Option<ForecastBudgetLine>, ForecastError> {
        Ok(self.with(|s| {
            s.forecast_lines
                .iter()
                .find(|l| l.tenant_id == tenant_id && l.id == id)
                .cloned()
        }))
    }

    async fn forecast_lines_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastBudgetLine>, ForecastError> {
        let mut lines = self.forecast_lines_of(tenant_id, year);
        lines.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(lines)
    }

    async fn delete_forecast_line_guarded(
        &self,
        tenant_id: TenantId,
        id: ForecastBudgetLineId,
    ) -> Result<GuardedDelete, ForecastError> {
        Ok(self.with(|s| {
            if !s
                .forecast_lines
                .iter()
                .any(|l| l.tenant_id == tenant_id && l.id == id)
            {
                return GuardedDelete::NotFound;
            }
            let expenses = s.expenses.iter().filter(|e| e.forecast_line_id == id).count();
            let references =
                BlockingReferences::new().with(EntityKind::ForecastExpense, expenses as u64);
            if !references.is_empty() {
                return GuardedDelete::Blocked(references);
            }
            s.forecast_lines.retain(|l| l.id != id);
            GuardedDelete::Deleted
        }))
    }

    async fn insert_expense(
        &self,
        expense: ForecastExpense,
    ) -> Result<ForecastExpense, ForecastError> {
        self.with(|s| s.expenses.push(expense.clone()));
        Ok(expense)
    }

    async fn find_expense(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            s.expenses
                .iter()
                .find(|e| e.tenant_id == tenant_id && e.id == id)
                .cloned()
        }))
    }

    async fn expenses_for_line(
        &self,
        tenant_id: TenantId,
        line_id: ForecastBudgetLineId,
    ) -> Result<Vec<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            s.expenses
                .iter()
                .filter(|e| e.tenant_id == tenant_id && e.forecast_line_id == line_id)
                .cloned()
                .collect()
        }))
    }

    async fn expenses_for_year(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            s.expenses
                .iter()
                .filter(|e| e.tenant_id == tenant_id && e.year == year)
                .cloned()
                .collect()
        }))
    }

    async fn update_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        patch: ExpensePatch,
    ) -> Result<ExpenseWrite<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            let Some(expense) = s
                .expenses
                .iter_mut()
                .find(|e| e.tenant_id == tenant_id && e.id == id)
            else {
                return ExpenseWrite::NotFound;
            };
            if expense.is_realized() {
                return ExpenseWrite::Locked;
            }
            expense.apply(&patch);
            ExpenseWrite::Applied(expense.clone())
        }))
    }

    async fn delete_expense_unless_realized(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
    ) -> Result<ExpenseWrite<()>, ForecastError> {
        Ok(self.with(|s| {
            let Some(expense) = s
                .expenses
                .iter()
                .find(|e| e.tenant_id == tenant_id && e.id == id)
            else {
                return ExpenseWrite::NotFound;
            };
            if expense.is_realized() {
                return ExpenseWrite::Locked;
            }
            s.expenses.retain(|e| e.id != id);
            ExpenseWrite::Applied(())
        }))
    }

    async fn link_purchase_order(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        order_id: PurchaseOrderId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            let expense = s
                .expenses
                .iter_mut()
                .find(|e| e.tenant_id == tenant_id && e.id == id)?;
            expense.purchase_order_ids.insert(order_id);
            Some(expense.clone())
        }))
    }

    async fn link_invoice(
        &self,
        tenant_id: TenantId,
        id: ForecastExpenseId,
        invoice_id: InvoiceId,
    ) -> Result<Option<ForecastExpense>, ForecastError> {
        Ok(self.with(|s| {
            let expense = s
                .expenses
                .iter_mut()
                .find(|e| e.tenant_id == tenant_id && e.id == id)?;
            expense.invoice_ids.insert(invoice_id);
            Some(expense.clone())
        }))
    }

    async fn purchase_order_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<PurchaseOrderId>,
    ) -> Result<HashMap<PurchaseOrderId, Decimal>, ForecastError> {
        Ok(self.with(|s| {
            s.orders
                .iter()
                .filter(|o| o.tenant_id == tenant_id && ids.contains(&o.id))
                .map(|o| (o.id, o.amount))
                .collect()
        }))
    }

    async fn invoice_amounts(
        &self,
        tenant_id: TenantId,
        ids: Vec<InvoiceId>,
    ) -> Result<HashMap<InvoiceId, Decimal>, ForecastError> {
        Ok(self.with(|s| {
            s.invoices
                .iter()
                .filter(|i| i.tenant_id == tenant_id && ids.contains(&i.id))
                .map(|i| (i.id, i.amount))
                .collect()
        }))
    }

    async fn upsert_envelope(
        &self,
        envelope: AnnualBudgetEnvelope,
    ) -> Result<AnnualBudgetEnvelope, ForecastError> {
        self.seed_envelope(
            envelope.tenant_id,
            envelope.year,
            envelope.functioning,
            envelope.investment,
        );
        Ok(envelope)
    }

    async fn find_envelope(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Option<AnnualBudgetEnvelope>, ForecastError> {
        Ok(self.with(|s| {
            s.envelopes
                .iter()
                .find(|e| e.tenant_id == tenant_id && e.year == year)
                .cloned()
        }))
    }
}

// ============================================================================
// Fiscal years
// ============================================================================

impl YearRepository for MemoryStore {
    async fn year_occupancy(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<YearOccupancy, YearError> {
        Ok(self.with(|s| s.occupancy(tenant_id, year)))
    }

    async fn year_forecast_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
    ) -> Result<Vec<ForecastBudgetLine>, YearError> {
        Ok(self.forecast_lines_of(tenant_id, year))
    }

    async fn create_year_lines(
        &self,
        tenant_id: TenantId,
        year: i32,
        lines: Vec<ForecastBudgetLine>,
    ) -> Result<YearWrite, YearError> {
        Ok(self.with(|s| {
            if s.occupancy(tenant_id, year).is_taken() {
                return YearWrite::Duplicate;
            }
            let created = lines.len();
            s.forecast_lines.extend(lines);
            YearWrite::Created(created)
        }))
    }

    async fn known_years(&self, tenant_id: TenantId) -> Result<Vec<i32>, YearError> {
        Ok(self.with(|s| {
            s.forecast_lines
                .iter()
                .filter(|l| l.tenant_id == tenant_id)
                .map(|l| l.year)
                .chain(
                    s.envelopes
                        .iter()
                        .filter(|e| e.tenant_id == tenant_id)
                        .map(|e| e.year),
                )
                .chain(
                    s.yearly
                        .iter()
                        .filter(|(t, _)| *t == tenant_id)
                        .map(|(_, b)| b.year),
                )
                .collect()
        }))
    }
}

// ============================================================================
// Catalog
// ============================================================================

impl CatalogRepository for MemoryStore {
    async fn name_taken(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        name: String,
    ) -> Result<bool, CatalogError> {
        let name = name.to_lowercase();
        Ok(self.with(|s| {
            s.catalog
                .iter()
                .any(|e| {
                    e.tenant_id == tenant_id && e.kind == kind && e.name.to_lowercase() == name
                })
        }))
    }

    async fn insert_entry(&self, entry: CatalogEntry) -> Result<CatalogEntry, CatalogError> {
        self.with(|s| s.catalog.push(entry.clone()));
        Ok(entry)
    }

    async fn list_entries(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut entries: Vec<CatalogEntry> = self.with(|s| {
            s.catalog
                .iter()
                .filter(|e| e.tenant_id == tenant_id && e.kind == kind)
                .cloned()
                .collect()
        });
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn delete_entry_guarded(
        &self,
        tenant_id: TenantId,
        kind: CatalogKind,
        id: Uuid,
    ) -> Result<GuardedDelete, CatalogError> {
        Ok(self.with(|s| {
            if !s.catalog_has(tenant_id, kind, id) {
                return GuardedDelete::NotFound;
            }
            let references = s.catalog_references(tenant_id, kind, id);
            if !references.is_empty() {
                return GuardedDelete::Blocked(references);
            }
            s.catalog.retain(|e| e.id != id);
            GuardedDelete::Deleted
        }))
    }
}

// ============================================================================
// Rollup
// ============================================================================

impl RollupSource for MemoryStore {
    async fn snapshot(
        &self,
        tenant_id: TenantId,
        _source: DataSource,
    ) -> Result<TenantSnapshot, RollupError> {
        Ok(self.with(|s| {
            let budget_lines: Vec<BudgetLine> = s
                .lines
                .iter()
                .filter(|l| l.tenant_id == tenant_id)
                .cloned()
                .collect();
            let allocations = budget_lines
                .iter()
                .filter_map(|l| s.allocations.get(&l.id).map(|a| (l.id, a.clone())))
                .collect();
            TenantSnapshot {
                budget_lines,
                yearly_budgets: s
                    .yearly
                    .iter()
                    .filter(|(t, _)| *t == tenant_id)
                    .map(|(_, b)| b.clone())
                    .collect(),
                allocations,
                contracts: s
                    .contracts
                    .iter()
                    .filter(|c| c.tenant_id == tenant_id)
                    .cloned()
                    .collect(),
                invoices: s
                    .invoices
                    .iter()
                    .filter(|i| i.tenant_id == tenant_id)
                    .cloned()
                    .collect(),
                names: s
                    .catalog
                    .iter()
                    .filter(|e| e.tenant_id == tenant_id)
                    .map(|e| (e.id, e.name.clone()))
                    .collect(),
            }
        }))
    }
}
