//! Queries shared by several repositories.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use budgetops_core::budget::BudgetLine;
use budgetops_core::catalog::CatalogKind;
use budgetops_core::integrity::BlockingReferences;
use budgetops_core::procurement::{Contract, Invoice};
use budgetops_shared::types::{BudgetLineId, EntityKind, TenantId};

use super::convert;
use crate::entities::{
    budget_lines, catalog_entries, contracts, forecast_budget_lines, forecast_expenses, invoices,
    pole_allocations, purchase_orders,
};

/// Returns true if a record of `kind` with `id` exists for the tenant.
pub(crate) async fn reference_exists<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    kind: EntityKind,
    id: Uuid,
) -> Result<bool, DbErr> {
    let tenant = tenant_id.0;
    let count = match kind {
        EntityKind::BudgetLine => {
            budget_lines::Entity::find_by_id(id)
                .filter(budget_lines::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        EntityKind::Pole => catalog_count(conn, tenant_id, CatalogKind::Pole, id).await?,
        EntityKind::Domain => catalog_count(conn, tenant_id, CatalogKind::Domain, id).await?,
        EntityKind::BudgetType => {
            catalog_count(conn, tenant_id, CatalogKind::BudgetType, id).await?
        }
        EntityKind::Vendor => catalog_count(conn, tenant_id, CatalogKind::Vendor, id).await?,
        EntityKind::Contract => {
            contracts::Entity::find_by_id(id)
                .filter(contracts::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        EntityKind::Invoice => {
            invoices::Entity::find_by_id(id)
                .filter(invoices::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        EntityKind::PurchaseOrder => {
            purchase_orders::Entity::find_by_id(id)
                .filter(purchase_orders::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        EntityKind::ForecastBudgetLine => {
            forecast_budget_lines::Entity::find_by_id(id)
                .filter(forecast_budget_lines::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        EntityKind::ForecastExpense => {
            forecast_expenses::Entity::find_by_id(id)
                .filter(forecast_expenses::Column::TenantId.eq(tenant))
                .count(conn)
                .await?
        }
        // Keyed by line or year, never referenced by id.
        EntityKind::PoleAllocation | EntityKind::BudgetEnvelope => 0,
    };
    Ok(count > 0)
}

async fn catalog_count<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    kind: CatalogKind,
    id: Uuid,
) -> Result<u64, DbErr> {
    catalog_entries::Entity::find_by_id(id)
        .filter(catalog_entries::Column::TenantId.eq(tenant_id.0))
        .filter(catalog_entries::Column::Kind.eq(convert::catalog_kind_to_db(kind)))
        .count(conn)
        .await
}

/// Find a budget line, optionally taking a row lock.
pub(crate) async fn budget_line<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    id: BudgetLineId,
    lock: bool,
) -> Result<Option<BudgetLine>, DbErr> {
    let mut query = budget_lines::Entity::find_by_id(id.0)
        .filter(budget_lines::Column::TenantId.eq(tenant_id.0));
    if lock {
        query = query.lock_exclusive();
    }
    query.one(conn).await?.map(convert::budget_line).transpose()
}

/// Contracts of a tenant, optionally restricted to one budget line.
pub(crate) async fn contracts<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    line: Option<BudgetLineId>,
) -> Result<Vec<Contract>, DbErr> {
    let mut query = contracts::Entity::find().filter(contracts::Column::TenantId.eq(tenant_id.0));
    if let Some(line) = line {
        query = query.filter(contracts::Column::BudgetLineId.eq(line.0));
    }
    query
        .order_by_asc(contracts::Column::StartDate)
        .all(conn)
        .await?
        .into_iter()
        .map(convert::contract)
        .collect()
}

/// Invoices of a tenant, optionally restricted to one budget line.
pub(crate) async fn invoices<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    line: Option<BudgetLineId>,
) -> Result<Vec<Invoice>, DbErr> {
    let mut query = invoices::Entity::find().filter(invoices::Column::TenantId.eq(tenant_id.0));
    if let Some(line) = line {
        query = query.filter(invoices::Column::BudgetLineId.eq(line.0));
    }
    query
        .order_by_asc(invoices::Column::InvoiceDate)
        .all(conn)
        .await?
        .into_iter()
        .map(convert::invoice)
        .collect()
}

/// Records pointing at a catalog entry, limited to the kinds that block its deletion.
pub(crate) async fn catalog_references<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    kind: CatalogKind,
    id: Uuid,
) -> Result<BlockingReferences, DbErr> {
    let tenant = tenant_id.0;
    let mut references = BlockingReferences::new();
    match kind {
        CatalogKind::Pole => {
            references.add(
                EntityKind::PoleAllocation,
                pole_allocations::Entity::find()
                    .filter(pole_allocations::Column::TenantId.eq(tenant))
                    .filter(pole_allocations::Column::PoleId.eq(id))
                    .count(conn)
                    .await?,
            );
            references.add(
                EntityKind::BudgetLine,
                budget_lines::Entity::find()
                    .filter(budget_lines::Column::TenantId.eq(tenant))
                    .filter(budget_lines::Column::PoleId.eq(id))
                    .count(conn)
                    .await?,
            );
        }
        CatalogKind::Domain | CatalogKind::BudgetType => {
            let (line_column, forecast_column) = if kind == CatalogKind::Domain {
                (
                    budget_lines::Column::DomainId,
                    forecast_budget_lines::Column::DomainId,
                )
            } else {
                (
                    budget_lines::Column::BudgetTypeId,
                    forecast_budget_lines::Column::BudgetTypeId,
                )
            };
            references.add(
                EntityKind::BudgetLine,
                budget_lines::Entity::find()
                    .filter(budget_lines::Column::TenantId.eq(tenant))
                    .filter(line_column.eq(id))
                    .count(conn)
                    .await?,
            );
            references.add(
                EntityKind::ForecastBudgetLine,
                forecast_budget_lines::Entity::find()
                    .filter(forecast_budget_lines::Column::TenantId.eq(tenant))
                    .filter(forecast_column.eq(id))
                    .count(conn)
                    .await?,
            );
        }
        CatalogKind::Vendor => {
            references.add(
                EntityKind::Contract,
                contracts::Entity::find()
                    .filter(contracts::Column::TenantId.eq(tenant))
                    .filter(contracts::Column::VendorId.eq(id))
                    .count(conn)
                    .await?,
            );
            references.add(
                EntityKind::Invoice,
                invoices::Entity::find()
                    .filter(invoices::Column::TenantId.eq(tenant))
                    .filter(invoices::Column::VendorId.eq(id))
                    .count(conn)
                    .await?,
            );
            references.add(
                EntityKind::PurchaseOrder,
                purchase_orders::Entity::find()
                    .filter(purchase_orders::Column::TenantId.eq(tenant))
                    .filter(purchase_orders::Column::VendorId.eq(id))
                    .count(conn)
                    .await?,
            );
        }
    }
    Ok(references)
}
