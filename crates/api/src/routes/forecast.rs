//! Forecast routes: lines, expenses, document links, bulk edits and envelopes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use budgetops_core::forecast::{
    BulkOutcome, CreateExpenseInput, CreateForecastLineInput, UpdateExpenseInput,
};
use budgetops_shared::AppError;
use budgetops_shared::types::{
    ForecastBudgetLineId, ForecastExpenseId, InvoiceId, PurchaseOrderId, TenantId,
};

use crate::{AppState, error::ApiError};

/// Creates the forecast routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/forecast-lines",
            get(list_lines).post(create_line),
        )
        .route(
            "/tenants/{tenant_id}/forecast-lines/{line_id}",
            get(get_line).delete(delete_line),
        )
        .route(
            "/tenants/{tenant_id}/forecast-lines/{line_id}/expenses",
            get(list_line_expenses),
        )
        .route(
            "/tenants/{tenant_id}/forecast-lines/{line_id}/totals",
            get(get_line_totals),
        )
        .route("/tenants/{tenant_id}/expenses", post(create_expense))
        .route(
            "/tenants/{tenant_id}/expenses/{expense_id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
        .route(
            "/tenants/{tenant_id}/expenses/{expense_id}/purchase-orders",
            post(link_purchase_order),
        )
        .route(
            "/tenants/{tenant_id}/expenses/{expense_id}/invoices",
            post(link_invoice),
        )
        .route(
            "/tenants/{tenant_id}/expenses/{expense_id}/totals",
            get(get_expense_totals),
        )
        .route("/tenants/{tenant_id}/expenses/bulk/delete", post(bulk_delete))
        .route("/tenants/{tenant_id}/expenses/bulk/reassign", post(bulk_reassign))
        .route(
            "/tenants/{tenant_id}/expenses/bulk/coefficient",
            post(bulk_coefficient),
        )
        .route(
            "/tenants/{tenant_id}/forecast/years/{year}",
            get(get_year_rollup),
        )
        .route(
            "/tenants/{tenant_id}/envelopes/{year}",
            put(set_envelope),
        )
        .route(
            "/tenants/{tenant_id}/envelopes/{year}/comparison",
            get(get_envelope_comparison),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query selecting a fiscal year.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Fiscal year.
    pub year: i32,
}

/// Request body linking a purchase order.
#[derive(Debug, Deserialize)]
pub struct LinkPurchaseOrderRequest {
    /// Purchase order to link.
    pub purchase_order_id: PurchaseOrderId,
}

/// Request body linking an invoice.
#[derive(Debug, Deserialize)]
pub struct LinkInvoiceRequest {
    /// Invoice to link.
    pub invoice_id: InvoiceId,
}

/// Request body for a bulk delete.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    /// Expenses to delete.
    pub expense_ids: Vec<ForecastExpenseId>,
}

/// Request body for a bulk reassignment.
#[derive(Debug, Deserialize)]
pub struct BulkReassignRequest {
    /// Expenses to move.
    pub expense_ids: Vec<ForecastExpenseId>,
    /// Target forecast line.
    pub target_line_id: ForecastBudgetLineId,
}

/// Request body for a bulk coefficient.
#[derive(Debug, Deserialize)]
pub struct BulkCoefficientRequest {
    /// Expenses to scale.
    pub expense_ids: Vec<ForecastExpenseId>,
    /// Positive multiplier.
    pub coefficient: Decimal,
}

/// Request body for an envelope.
#[derive(Debug, Deserialize)]
pub struct EnvelopeRequest {
    /// Functioning ceiling.
    pub functioning: Decimal,
    /// Investment ceiling.
    pub investment: Decimal,
}

/// A failed bulk item.
#[derive(Debug, Serialize)]
pub struct BulkFailureResponse {
    /// Expense the item targeted.
    pub expense_id: ForecastExpenseId,
    /// Error code.
    pub error: &'static str,
    /// Error message.
    pub message: String,
}

/// Per-item tally of a bulk operation.
#[derive(Debug, Serialize)]
pub struct BulkResponse {
    /// Number of items that went through.
    pub succeeded_count: usize,
    /// Number of items that failed.
    pub failed_count: usize,
    /// Items that went through.
    pub succeeded: Vec<ForecastExpenseId>,
    /// Items that failed, with the reason.
    pub failed: Vec<BulkFailureResponse>,
}

impl From<BulkOutcome> for BulkResponse {
    fn from(outcome: BulkOutcome) -> Self {
        let succeeded_count = outcome.succeeded_count();
        let failed_count = outcome.failed_count();
        let failed = outcome
            .failed
            .into_iter()
            .map(|failure| {
                let err = AppError::from(failure.error);
                BulkFailureResponse {
                    expense_id: failure.expense_id,
                    error: err.error_code(),
                    message: err.to_string(),
                }
            })
            .collect();
        Self {
            succeeded_count,
            failed_count,
            succeeded: outcome.succeeded,
            failed,
        }
    }
}

// ============================================================================
// Forecast lines
// ============================================================================

/// POST `/tenants/{tenant_id}/forecast-lines`
async fn create_line(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateForecastLineInput>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state
        .forecast()
        .create_forecast_line(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// GET `/tenants/{tenant_id}/forecast-lines?year=2026`
async fn list_lines(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lines = state
        .forecast()
        .list_forecast_lines(TenantId(tenant_id), query.year)
        .await?;
    Ok(Json(lines))
}

/// GET `/tenants/{tenant_id}/forecast-lines/{line_id}`
async fn get_line(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state
        .forecast()
        .get_forecast_line(TenantId(tenant_id), ForecastBudgetLineId(line_id))
        .await?;
    Ok(Json(line))
}

/// DELETE `/tenants/{tenant_id}/forecast-lines/{line_id}`
async fn delete_line(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .forecast()
        .delete_forecast_line(TenantId(tenant_id), ForecastBudgetLineId(line_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/tenants/{tenant_id}/forecast-lines/{line_id}/expenses`
async fn list_line_expenses(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let expenses = state
        .forecast()
        .list_expenses(TenantId(tenant_id), ForecastBudgetLineId(line_id))
        .await?;
    Ok(Json(expenses))
}

/// GET `/tenants/{tenant_id}/forecast-lines/{line_id}/totals`
async fn get_line_totals(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let totals = state
        .forecast()
        .line_totals(TenantId(tenant_id), ForecastBudgetLineId(line_id))
        .await?;
    Ok(Json(totals))
}

/// GET `/tenants/{tenant_id}/forecast/years/{year}`
async fn get_year_rollup(
    State(state): State<AppState>,
    Path((tenant_id, year)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let rollup = state.forecast().year_rollup(TenantId(tenant_id), year).await?;
    Ok(Json(rollup))
}

// ============================================================================
// Expenses
// ============================================================================

/// POST `/tenants/{tenant_id}/expenses`
async fn create_expense(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateExpenseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state
        .forecast()
        .create_expense(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET `/tenants/{tenant_id}/expenses/{expense_id}`
async fn get_expense(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state
        .forecast()
        .get_expense(TenantId(tenant_id), ForecastExpenseId(expense_id))
        .await?;
    Ok(Json(expense))
}

/// PATCH `/tenants/{tenant_id}/expenses/{expense_id}`
///
/// Refused with 423 once an invoice is linked.
async fn update_expense(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateExpenseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state
        .forecast()
        .update_expense(TenantId(tenant_id), ForecastExpenseId(expense_id), input)
        .await?;
    Ok(Json(expense))
}

/// DELETE `/tenants/{tenant_id}/expenses/{expense_id}`
async fn delete_expense(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .forecast()
        .delete_expense(TenantId(tenant_id), ForecastExpenseId(expense_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/tenants/{tenant_id}/expenses/{expense_id}/purchase-orders`
async fn link_purchase_order(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LinkPurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state
        .forecast()
        .link_purchase_order(
            TenantId(tenant_id),
            ForecastExpenseId(expense_id),
            payload.purchase_order_id,
        )
        .await?;
    Ok(Json(expense))
}

/// POST `/tenants/{tenant_id}/expenses/{expense_id}/invoices`
async fn link_invoice(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LinkInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state
        .forecast()
        .link_invoice(
            TenantId(tenant_id),
            ForecastExpenseId(expense_id),
            payload.invoice_id,
        )
        .await?;
    Ok(Json(expense))
}

/// GET `/tenants/{tenant_id}/expenses/{expense_id}/totals`
async fn get_expense_totals(
    State(state): State<AppState>,
    Path((tenant_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let totals = state
        .forecast()
        .compute_totals(TenantId(tenant_id), ForecastExpenseId(expense_id))
        .await?;
    Ok(Json(totals))
}

// ============================================================================
// Bulk operations
// ============================================================================

/// POST `/tenants/{tenant_id}/expenses/bulk/delete`
async fn bulk_delete(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .forecast()
        .bulk_delete(TenantId(tenant_id), &payload.expense_ids)
        .await?;
    Ok(Json(BulkResponse::from(outcome)))
}

/// POST `/tenants/{tenant_id}/expenses/bulk/reassign`
async fn bulk_reassign(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<BulkReassignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .forecast()
        .bulk_reassign(TenantId(tenant_id), &payload.expense_ids, payload.target_line_id)
        .await?;
    Ok(Json(BulkResponse::from(outcome)))
}

/// POST `/tenants/{tenant_id}/expenses/bulk/coefficient`
async fn bulk_coefficient(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<BulkCoefficientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .forecast()
        .bulk_apply_coefficient(TenantId(tenant_id), &payload.expense_ids, payload.coefficient)
        .await?;
    Ok(Json(BulkResponse::from(outcome)))
}

// ============================================================================
// Envelopes
// ============================================================================

/// PUT `/tenants/{tenant_id}/envelopes/{year}`
async fn set_envelope(
    State(state): State<AppState>,
    Path((tenant_id, year)): Path<(Uuid, i32)>,
    Json(payload): Json<EnvelopeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let envelope = state
        .forecast()
        .set_envelope(
            TenantId(tenant_id),
            year,
            payload.functioning,
            payload.investment,
        )
        .await?;
    Ok(Json(envelope))
}

/// GET `/tenants/{tenant_id}/envelopes/{year}/comparison`
async fn get_envelope_comparison(
    State(state): State<AppState>,
    Path((tenant_id, year)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let comparison = state
        .forecast()
        .envelope_comparison(TenantId(tenant_id), year)
        .await?;
    Ok(Json(comparison))
}
