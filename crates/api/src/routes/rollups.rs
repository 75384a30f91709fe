//! Rollup routes: configurable widgets and the yearly cockpit.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use budgetops_core::rollup::WidgetConfig;
use budgetops_shared::types::TenantId;

use crate::{AppState, error::ApiError};

/// Creates the rollup routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/rollups", post(run_rollup))
        .route("/tenants/{tenant_id}/cockpit/{year}", get(get_cockpit))
}

/// POST `/tenants/{tenant_id}/rollups`
///
/// Runs the widget configuration in the body.
async fn run_rollup(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(config): Json<WidgetConfig>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.rollup().run(TenantId(tenant_id), &config).await?;
    Ok(Json(result))
}

/// GET `/tenants/{tenant_id}/cockpit/{year}`
async fn get_cockpit(
    State(state): State<AppState>,
    Path((tenant_id, year)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .rollup()
        .cockpit_summary(TenantId(tenant_id), year)
        .await?;
    Ok(Json(summary))
}
