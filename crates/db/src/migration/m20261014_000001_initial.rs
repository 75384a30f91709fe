//! Initial database migration.
//!
//! Creates the catalog, budget line, procurement, forecast and envelope
//! tables with their tenant isolation policies.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: REFERENCE DATA
        // ============================================================
        db.execute_unprepared(CATALOG_SQL).await?;

        // ============================================================
        // PART 2: BUDGET LINES
        // ============================================================
        db.execute_unprepared(BUDGET_LINES_SQL).await?;
        db.execute_unprepared(YEARLY_BUDGETS_SQL).await?;
        db.execute_unprepared(POLE_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 3: LINKED DOCUMENTS
        // ============================================================
        db.execute_unprepared(PROCUREMENT_SQL).await?;

        // ============================================================
        // PART 4: FORECAST
        // ============================================================
        db.execute_unprepared(FORECAST_SQL).await?;
        db.execute_unprepared(ENVELOPES_SQL).await?;

        // ============================================================
        // PART 5: ROW LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const CATALOG_SQL: &str = r"
CREATE TABLE catalog_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    kind VARCHAR(20) NOT NULL CHECK (kind IN ('pole', 'domain', 'budget_type', 'vendor')),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Names are unique per tenant and kind, ignoring case
CREATE UNIQUE INDEX uq_catalog_entries_name ON catalog_entries(tenant_id, kind, lower(name));
";

const BUDGET_LINES_SQL: &str = r"
CREATE TABLE budget_lines (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    label TEXT NOT NULL,
    nature VARCHAR(20) NOT NULL CHECK (nature IN ('functioning', 'investment')),
    budget_type_id UUID REFERENCES catalog_entries(id),
    domain_id UUID REFERENCES catalog_entries(id),
    accounting_code VARCHAR(50),
    pole_id UUID REFERENCES catalog_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_budget_lines_tenant ON budget_lines(tenant_id, label);
";

const YEARLY_BUDGETS_SQL: &str = r"
CREATE TABLE yearly_budgets (
    budget_line_id UUID NOT NULL REFERENCES budget_lines(id) ON DELETE CASCADE,
    tenant_id UUID NOT NULL,
    year INTEGER NOT NULL CHECK (year BETWEEN 1900 AND 2999),
    amount NUMERIC(18, 2) NOT NULL,
    PRIMARY KEY (budget_line_id, year)
);

CREATE INDEX idx_yearly_budgets_tenant_year ON yearly_budgets(tenant_id, year);
";

const POLE_ALLOCATIONS_SQL: &str = r"
CREATE TABLE pole_allocations (
    budget_line_id UUID NOT NULL REFERENCES budget_lines(id) ON DELETE CASCADE,
    pole_id UUID NOT NULL REFERENCES catalog_entries(id),
    tenant_id UUID NOT NULL,
    percentage NUMERIC(5, 2) NOT NULL CHECK (percentage >= 0 AND percentage <= 100),
    position INTEGER NOT NULL,
    PRIMARY KEY (budget_line_id, pole_id)
);

CREATE INDEX idx_pole_allocations_pole ON pole_allocations(pole_id);
";

const PROCUREMENT_SQL: &str = r"
CREATE TABLE contracts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    budget_line_id UUID REFERENCES budget_lines(id),
    vendor_id UUID REFERENCES catalog_entries(id),
    label TEXT NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    start_date DATE NOT NULL,
    end_date DATE,
    status VARCHAR(20) NOT NULL CHECK (status IN ('draft', 'active', 'closed', 'cancelled')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_contract_dates CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_contracts_line ON contracts(budget_line_id);
CREATE INDEX idx_contracts_vendor ON contracts(vendor_id);

CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    budget_line_id UUID REFERENCES budget_lines(id),
    contract_id UUID REFERENCES contracts(id),
    vendor_id UUID REFERENCES catalog_entries(id),
    number VARCHAR(100) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    invoice_date DATE NOT NULL,
    status VARCHAR(20) NOT NULL CHECK (status IN ('pending', 'validated', 'paid', 'cancelled')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_line ON invoices(budget_line_id);
CREATE INDEX idx_invoices_vendor ON invoices(vendor_id);

CREATE TABLE purchase_orders (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    budget_line_id UUID REFERENCES budget_lines(id),
    vendor_id UUID REFERENCES catalog_entries(id),
    number VARCHAR(100) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    order_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_purchase_orders_line ON purchase_orders(budget_line_id);
";

const FORECAST_SQL: &str = r"
CREATE TABLE forecast_budget_lines (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    label TEXT NOT NULL,
    nature VARCHAR(20) NOT NULL CHECK (nature IN ('functioning', 'investment')),
    budget_type_id UUID REFERENCES catalog_entries(id),
    domain_id UUID REFERENCES catalog_entries(id),
    year INTEGER NOT NULL CHECK (year BETWEEN 1900 AND 2999),
    budget NUMERIC(18, 2) NOT NULL CHECK (budget >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_forecast_lines_year ON forecast_budget_lines(tenant_id, year);

CREATE TABLE forecast_expenses (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    forecast_line_id UUID NOT NULL REFERENCES forecast_budget_lines(id),
    label TEXT NOT NULL,
    description TEXT,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    year INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_forecast_expenses_line ON forecast_expenses(forecast_line_id);
CREATE INDEX idx_forecast_expenses_year ON forecast_expenses(tenant_id, year);

CREATE TABLE forecast_expense_purchase_orders (
    expense_id UUID NOT NULL REFERENCES forecast_expenses(id) ON DELETE CASCADE,
    purchase_order_id UUID NOT NULL REFERENCES purchase_orders(id),
    PRIMARY KEY (expense_id, purchase_order_id)
);

CREATE TABLE forecast_expense_invoices (
    expense_id UUID NOT NULL REFERENCES forecast_expenses(id) ON DELETE CASCADE,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    PRIMARY KEY (expense_id, invoice_id)
);
";

const ENVELOPES_SQL: &str = r"
CREATE TABLE budget_envelopes (
    tenant_id UUID NOT NULL,
    year INTEGER NOT NULL CHECK (year BETWEEN 1900 AND 2999),
    functioning NUMERIC(18, 2) NOT NULL CHECK (functioning >= 0),
    investment NUMERIC(18, 2) NOT NULL CHECK (investment >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (tenant_id, year)
);
";

const RLS_SQL: &str = r"
DO $$
DECLARE
    t TEXT;
BEGIN
    FOREACH t IN ARRAY ARRAY[
        'catalog_entries', 'budget_lines', 'yearly_budgets', 'pole_allocations',
        'contracts', 'invoices', 'purchase_orders', 'forecast_budget_lines',
        'forecast_expenses', 'budget_envelopes'
    ] LOOP
        EXECUTE format('ALTER TABLE %I ENABLE ROW LEVEL SECURITY', t);
        EXECUTE format(
            'CREATE POLICY tenant_isolation ON %I USING (tenant_id = current_setting(''app.current_tenant_id'', true)::uuid)',
            t
        );
    END LOOP;
END
$$;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS budget_envelopes CASCADE;
DROP TABLE IF EXISTS forecast_expense_invoices CASCADE;
DROP TABLE IF EXISTS forecast_expense_purchase_orders CASCADE;
DROP TABLE IF EXISTS forecast_expenses CASCADE;
DROP TABLE IF EXISTS forecast_budget_lines CASCADE;
DROP TABLE IF EXISTS purchase_orders CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS contracts CASCADE;
DROP TABLE IF EXISTS pole_allocations CASCADE;
DROP TABLE IF EXISTS yearly_budgets CASCADE;
DROP TABLE IF EXISTS budget_lines CASCADE;
DROP TABLE IF EXISTS catalog_entries CASCADE;
";
