//! Procurement document routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use budgetops_core::procurement::{
    CreateContractInput, CreateInvoiceInput, CreatePurchaseOrderInput,
};
use budgetops_shared::types::TenantId;

use crate::{AppState, error::ApiError};

/// Creates the procurement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/contracts", post(create_contract))
        .route("/tenants/{tenant_id}/invoices", post(create_invoice))
        .route(
            "/tenants/{tenant_id}/purchase-orders",
            post(create_purchase_order),
        )
}

/// POST `/tenants/{tenant_id}/contracts`
async fn create_contract(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateContractInput>,
) -> Result<impl IntoResponse, ApiError> {
    let contract = state
        .procurement()
        .create_contract(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// POST `/tenants/{tenant_id}/invoices`
async fn create_invoice(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateInvoiceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = state
        .procurement()
        .create_invoice(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// POST `/tenants/{tenant_id}/purchase-orders`
async fn create_purchase_order(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .procurement()
        .create_purchase_order(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}
