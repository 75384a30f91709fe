//! Pole allocation routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use budgetops_core::allocation::PoleAllocation;
use budgetops_shared::types::{BudgetLineId, TenantId};

use crate::{AppState, error::ApiError};

/// Creates the allocation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/allocations",
            get(get_allocations).put(replace_allocations),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/ownership",
            get(get_ownership),
        )
        .route(
            "/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}/poles",
            get(get_pole_breakdown),
        )
}

/// Request body replacing the allocation set of a line.
#[derive(Debug, Deserialize)]
pub struct AllocationsRequest {
    /// New set; empty removes every allocation.
    pub allocations: Vec<PoleAllocation>,
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}/allocations`
async fn get_allocations(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let allocations = state
        .allocation()
        .get_allocations(TenantId(tenant_id), BudgetLineId(line_id))
        .await?;
    Ok(Json(allocations))
}

/// PUT `/tenants/{tenant_id}/budget-lines/{line_id}/allocations`
///
/// Replaces the whole set or nothing.
async fn replace_allocations(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AllocationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let allocations = state
        .allocation()
        .set_allocations(TenantId(tenant_id), BudgetLineId(line_id), payload.allocations)
        .await?;
    Ok(Json(allocations))
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}/ownership`
async fn get_ownership(
    State(state): State<AppState>,
    Path((tenant_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let ownership = state
        .allocation()
        .ownership(TenantId(tenant_id), BudgetLineId(line_id))
        .await?;
    Ok(Json(ownership))
}

/// GET `/tenants/{tenant_id}/budget-lines/{line_id}/years/{year}/poles`
///
/// Figures of the year split across the owning poles.
async fn get_pole_breakdown(
    State(state): State<AppState>,
    Path((tenant_id, line_id, year)): Path<(Uuid, Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = TenantId(tenant_id);
    let line_id = BudgetLineId(line_id);
    let figures = state.budget().yearly_figures(tenant_id, line_id, year).await?;
    let breakdown = state
        .allocation()
        .pole_breakdown(tenant_id, line_id, &figures)
        .await?;
    Ok(Json(breakdown))
}
