//! Fiscal year routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use budgetops_shared::types::TenantId;

use crate::{AppState, error::ApiError};

/// Creates the fiscal year routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/tenants/{tenant_id}/years",
        get(list_years).post(create_year),
    )
}

/// Request body for creating a fiscal year.
#[derive(Debug, Deserialize)]
pub struct CreateYearRequest {
    /// Year to create.
    pub year: i32,
    /// Year whose forecast lines are cloned.
    pub copy_from: Option<i32>,
}

/// Known fiscal years.
#[derive(Debug, Serialize)]
pub struct YearsResponse {
    /// Most recent first.
    pub years: Vec<i32>,
}

/// POST `/tenants/{tenant_id}/years`
async fn create_year(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .years()
        .create_year(TenantId(tenant_id), payload.year, payload.copy_from)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/tenants/{tenant_id}/years`
async fn list_years(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let years = state.years().list_years(TenantId(tenant_id)).await?;
    Ok(Json(YearsResponse { years }))
}
