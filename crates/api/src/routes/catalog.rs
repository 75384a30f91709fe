//! Catalog routes for poles, domains, budget types and vendors.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use uuid::Uuid;

use budgetops_core::catalog::CatalogKind;
use budgetops_shared::types::TenantId;

use crate::{AppState, error::ApiError};

/// Creates the catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/catalog/{kind}",
            get(list_entries).post(create_entry),
        )
        .route(
            "/tenants/{tenant_id}/catalog/{kind}/{entry_id}",
            delete(delete_entry),
        )
}

/// Request body for a catalog entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Name, unique per kind ignoring case.
    pub name: String,
}

/// Parses the plural path segment of a kind.
fn parse_kind(segment: &str) -> Result<CatalogKind, ApiError> {
    match segment {
        "poles" => Ok(CatalogKind::Pole),
        "domains" => Ok(CatalogKind::Domain),
        "budget-types" => Ok(CatalogKind::BudgetType),
        "vendors" => Ok(CatalogKind::Vendor),
        other => Err(ApiError::validation(format!(
            "Unknown catalog kind '{other}'. Must be one of: poles, domains, budget-types, vendors"
        ))),
    }
}

/// POST `/tenants/{tenant_id}/catalog/{kind}`
async fn create_entry(
    State(state): State<AppState>,
    Path((tenant_id, kind)): Path<(Uuid, String)>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    let entry = state
        .catalog()
        .create(TenantId(tenant_id), kind, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/tenants/{tenant_id}/catalog/{kind}`
async fn list_entries(
    State(state): State<AppState>,
    Path((tenant_id, kind)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    let entries = state.catalog().list(TenantId(tenant_id), kind).await?;
    Ok(Json(entries))
}

/// DELETE `/tenants/{tenant_id}/catalog/{kind}/{entry_id}`
///
/// Refused with 409 while records reference the entry.
async fn delete_entry(
    State(state): State<AppState>,
    Path((tenant_id, kind, entry_id)): Path<(Uuid, String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    state
        .catalog()
        .delete(TenantId(tenant_id), kind, entry_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
