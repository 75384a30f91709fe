//! Contract, invoice and purchase order repository.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use budgetops_core::procurement::{
    Contract, Invoice, ProcurementError, ProcurementRepository as ProcurementRepoTrait,
    PurchaseOrder,
};
use budgetops_shared::types::{EntityKind, TenantId};

use super::lookup;
use crate::entities::{contracts, invoices, purchase_orders};

/// Procurement repository implementation.
#[derive(Debug, Clone)]
pub struct ProcurementRepository {
    db: DatabaseConnection,
}

impl ProcurementRepository {
    /// Create a new procurement repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(err: DbErr) -> ProcurementError {
    ProcurementError::repository(err.to_string())
}

impl ProcurementRepoTrait for ProcurementRepository {
    async fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<bool, ProcurementError> {
        lookup::reference_exists(&self.db, tenant_id, kind, id)
            .await
            .map_err(db_err)
    }

    async fn insert_contract(&self, contract: Contract) -> Result<Contract, ProcurementError> {
        contracts::ActiveModel {
            id: Set(contract.id.0),
            tenant_id: Set(contract.tenant_id.0),
            budget_line_id: Set(contract.budget_line_id.map(|l| l.0)),
            vendor_id: Set(contract.vendor_id.map(|v| v.0)),
            label: Set(contract.label.clone()),
            amount: Set(contract.amount),
            start_date: Set(contract.start_date),
            end_date: Set(contract.end_date),
            status: Set(contract.status.as_str().to_string()),
            created_at: Set(contract.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(contract)
    }

    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, ProcurementError> {
        invoices::ActiveModel {
            id: Set(invoice.id.0),
            tenant_id: Set(invoice.tenant_id.0),
            budget_line_id: Set(invoice.budget_line_id.map(|l| l.0)),
            contract_id: Set(invoice.contract_id.map(|c| c.0)),
            vendor_id: Set(invoice.vendor_id.map(|v| v.0)),
            number: Set(invoice.number.clone()),
            amount: Set(invoice.amount),
            invoice_date: Set(invoice.invoice_date),
            status: Set(invoice.status.as_str().to_string()),
            created_at: Set(invoice.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(invoice)
    }

    async fn insert_purchase_order(
        &self,
        order: PurchaseOrder,
    ) -> Result<PurchaseOrder, ProcurementError> {
        purchase_orders::ActiveModel {
            id: Set(order.id.0),
            tenant_id: Set(order.tenant_id.0),
            budget_line_id: Set(order.budget_line_id.map(|l| l.0)),
            vendor_id: Set(order.vendor_id.map(|v| v.0)),
            number: Set(order.number.clone()),
            amount: Set(order.amount),
            order_date: Set(order.order_date),
            created_at: Set(order.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(order)
    }
}
