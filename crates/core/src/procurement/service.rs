//! Procurement service: validated document creation.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use budgetops_shared::types::{ContractId, EntityKind, InvoiceId, PurchaseOrderId, TenantId};

use super::error::ProcurementError;
use super::types::{
    Contract, CreateContractInput, CreateInvoiceInput, CreatePurchaseOrderInput, Invoice,
    PurchaseOrder,
};

/// Repository trait for procurement documents.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ProcurementRepository: Send + Sync {
    /// Check that a referenced record exists for the tenant.
    fn reference_exists(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, ProcurementError>> + Send;

    /// Persist a contract.
    fn insert_contract(
        &self,
        contract: Contract,
    ) -> impl std::future::Future<Output = Result<Contract, ProcurementError>> + Send;

    /// Persist an invoice.
    fn insert_invoice(
        &self,
        invoice: Invoice,
    ) -> impl std::future::Future<Output = Result<Invoice, ProcurementError>> + Send;

    /// Persist a purchase order.
    fn insert_purchase_order(
        &self,
        order: PurchaseOrder,
    ) -> impl std::future::Future<Output = Result<PurchaseOrder, ProcurementError>> + Send;
}

/// Procurement service.
pub struct ProcurementService<R: ProcurementRepository> {
    repo: Arc<R>,
}

impl<R: ProcurementRepository> ProcurementService<R> {
    /// Create a new procurement service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a contract.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The label is empty or the amount is not positive
    /// - The end date precedes the start date
    /// - The budget line or vendor does not exist
    pub async fn create_contract(
        &self,
        tenant_id: TenantId,
        input: CreateContractInput,
    ) -> Result<Contract, ProcurementError> {
        let label = require_text(&input.label, "Contract label")?;
        require_positive(input.amount)?;
        if let Some(end) = input.end_date
            && end < input.start_date
        {
            return Err(ProcurementError::validation(
                "Contract end date cannot precede its start date",
            ));
        }

        self.check_reference(
            tenant_id,
            EntityKind::BudgetLine,
            input.budget_line_id.map(|id| id.0),
        )
        .await?;
        self.check_reference(tenant_id, EntityKind::Vendor, input.vendor_id.map(|id| id.0))
            .await?;

        let contract = Contract {
            id: ContractId::new(),
            tenant_id,
            budget_line_id: input.budget_line_id,
            vendor_id: input.vendor_id,
            label,
            amount: input.amount,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            created_at: Utc::now(),
        };
        let contract = self.repo.insert_contract(contract).await?;
        tracing::info!(tenant_id = %tenant_id, contract_id = %contract.id, "contract created");
        Ok(contract)
    }

    /// Create an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is empty, the amount is not positive,
    /// or a referenced budget line, contract or vendor does not exist.
    pub async fn create_invoice(
        &self,
        tenant_id: TenantId,
        input: CreateInvoiceInput,
    ) -> Result<Invoice, ProcurementError> {
        let number = require_text(&input.number, "Invoice number")?;
        require_positive(input.amount)?;

        self.check_reference(
            tenant_id,
            EntityKind::BudgetLine,
            input.budget_line_id.map(|id| id.0),
        )
        .await?;
        self.check_reference(
            tenant_id,
            EntityKind::Contract,
            input.contract_id.map(|id| id.0),
        )
        .await?;
        self.check_reference(tenant_id, EntityKind::Vendor, input.vendor_id.map(|id| id.0))
            .await?;

        let invoice = Invoice {
            id: InvoiceId::new(),
            tenant_id,
            budget_line_id: input.budget_line_id,
            contract_id: input.contract_id,
            vendor_id: input.vendor_id,
            number,
            amount: input.amount,
            invoice_date: input.invoice_date,
            status: input.status,
            created_at: Utc::now(),
        };
        let invoice = self.repo.insert_invoice(invoice).await?;
        tracing::info!(tenant_id = %tenant_id, invoice_id = %invoice.id, "invoice created");
        Ok(invoice)
    }

    /// Create a purchase order.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is empty, the amount is not positive,
    /// or a referenced budget line or vendor does not exist.
    pub async fn create_purchase_order(
        &self,
        tenant_id: TenantId,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrder, ProcurementError> {
        let number = require_text(&input.number, "Purchase order number")?;
        require_positive(input.amount)?;

        self.check_reference(
            tenant_id,
            EntityKind::BudgetLine,
            input.budget_line_id.map(|id| id.0),
        )
        .await?;
        self.check_reference(tenant_id, EntityKind::Vendor, input.vendor_id.map(|id| id.0))
            .await?;

        let order = PurchaseOrder {
            id: PurchaseOrderId::new(),
            tenant_id,
            budget_line_id: input.budget_line_id,
            vendor_id: input.vendor_id,
            number,
            amount: input.amount,
            order_date: input.order_date,
            created_at: Utc::now(),
        };
        let order = self.repo.insert_purchase_order(order).await?;
        tracing::info!(
            tenant_id = %tenant_id,
            purchase_order_id = %order.id,
            "purchase order created"
        );
        Ok(order)
    }

    async fn check_reference(
        &self,
        tenant_id: TenantId,
        kind: EntityKind,
        id: Option<Uuid>,
    ) -> Result<(), ProcurementError> {
        let Some(id) = id else {
            return Ok(());
        };
        if self.repo.reference_exists(tenant_id, kind, id).await? {
            Ok(())
        } else {
            tracing::warn!(tenant_id = %tenant_id, %kind, %id, "procurement reference missing");
            Err(ProcurementError::InvalidReference { kind, id })
        }
    }
}

fn require_text(value: &str, what: &str) -> Result<String, ProcurementError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProcurementError::validation(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_positive(amount: Decimal) -> Result<(), ProcurementError> {
    if amount <= Decimal::ZERO {
        return Err(ProcurementError::validation("Amount must be positive"));
    }
    Ok(())
}
