//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod allocations;
pub mod budget_lines;
pub mod catalog;
pub mod forecast;
pub mod health;
pub mod procurement;
pub mod rollups;
pub mod years;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(budget_lines::routes())
        .merge(allocations::routes())
        .merge(forecast::routes())
        .merge(rollups::routes())
        .merge(years::routes())
        .merge(catalog::routes())
        .merge(procurement::routes())
}
