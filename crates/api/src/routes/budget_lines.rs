//! Budget line routes: lines, yearly budgets and derived figures.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use budgetops_core::budget::{CreateBudgetLineInput, LineVariance, YearlyFigures};
use budgetops_shared::types::{BudgetLineId, TenantId};

use crate::{AppState, error::ApiError};

/// Creates the budget line routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/budget-lines",
            get(list_lines).post(create_line),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}",
            get(get_line).delete(delete_line),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}",
            put(set_yearly_budget),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}/figures",
            get(get_figures),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/figures",
            get(get_figures_history),
        )
}

/// Request body for a yearly budget.
#[derive(Debug, Deserialize)]
pub struct YearlyBudgetRequest {
    /// Planned amount.
    pub amount: Decimal,
}

/// Figures of one year with their variance.
#[derive(Debug, Serialize)]
pub struct FiguresResponse {
    /// Planned, engaged and invoiced amounts.
    pub figures: YearlyFigures,
    /// Variance against the plan.
    pub variance: LineVariance,
}

impl From<YearlyFigures> for FiguresResponse {
    fn from(figures: YearlyFigures) -> Self {
        Self {
            variance: LineVariance::calculate(&figures),
            figures,
        }
    }
}

/// POST `/tenants/{tenant_id}/budget-lines`
async fn create_line(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateBudgetLineInput>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state
        .budget()
        .create_budget_line(TenantId(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// GET `/tenants/{tenant_id}/budget-lines`
async fn list_lines(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lines = state.budget().list_budget_lines(TenantId(tenant_id)).await?;
    Ok(Json(lines))
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}`
async fn get_line(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state
        .budget()
        .get_budget_line(TenantId(tenant_id), BudgetLineId(line_id))
        .await?;
    Ok(Json(line))
}

/// DELETE `/tenants/{tenant_id}/budget-lines/{line_id}`
///
/// Refused with 409 while documents reference the line.
async fn delete_line(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .budget()
        .delete_budget_line(TenantId(tenant_id), BudgetLineId(line_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}`
async fn set_yearly_budget(
    State(state): State<AppState>,
    Path((tenant_id, line_id, year)): Path<(Uuid, Uuid, i32)>,
    Json(payload): Json<YearlyBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budget = state
        .budget()
        .set_yearly_budget(TenantId(tenant_id), BudgetLineId(line_id), year, payload.amount)
        .await?;
    Ok(Json(budget))
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}/figures`
async fn get_figures(
    State(state): State<AppState>,
    Path((tenant_id, line_id, year)): Path<(Uuid, Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let figures = state
        .budget()
        .yearly_figures(TenantId(tenant_id), BudgetLineId(line_id), year)
        .await?;
    Ok(Json(FiguresResponse::from(figures)))
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}/figures`
///
/// Every year with a plan or a document, most recent first.
async fn get_figures_history(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let history: Vec<FiguresResponse> = state
        .budget()
        .figures_history(TenantId(tenant_id), BudgetLineId(line_id))
        .await?
        .into_iter()
        .map(FiguresResponse::from)
        .collect();
    Ok(Json(history))
}
