//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1/tenants/{tenant_id}`
//! - Error responses with stable codes
//! - Construction of the engine services over the database repositories

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use budgetops_core::allocation::AllocationService;
use budgetops_core::budget::BudgetService;
use budgetops_core::catalog::CatalogService;
use budgetops_core::fiscal::YearService;
use budgetops_core::forecast::ForecastService;
use budgetops_core::procurement::ProcurementService;
use budgetops_core::rollup::{RollupAggregator, RollupService};
use budgetops_db::{
    AllocationRepository, BudgetLineRepository, CatalogRepository, ForecastRepository,
    ProcurementRepository, RollupRepository, YearRepository,
};
use budgetops_shared::EngineConfig;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Engine tuning.
    pub engine: Arc<EngineConfig>,
}

impl AppState {
    /// Create the state from a connection and engine settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, engine: EngineConfig) -> Self {
        Self {
            db: Arc::new(db),
            engine: Arc::new(engine),
        }
    }

    fn connection(&self) -> DatabaseConnection {
        (*self.db).clone()
    }

    /// Budget line service.
    #[must_use]
    pub fn budget(&self) -> BudgetService<BudgetLineRepository> {
        BudgetService::new(Arc::new(BudgetLineRepository::new(self.connection())))
    }

    /// Pole allocation service, using the configured tolerance.
    #[must_use]
    pub fn allocation(&self) -> AllocationService<AllocationRepository> {
        AllocationService::new(Arc::new(AllocationRepository::new(self.connection())))
            .with_tolerance(self.engine.allocation_tolerance)
    }

    /// Forecast reconciliation service.
    #[must_use]
    pub fn forecast(&self) -> ForecastService<ForecastRepository> {
        ForecastService::new(Arc::new(ForecastRepository::new(self.connection())))
    }

    /// Rollup service, using the configured bucket label and cap.
    #[must_use]
    pub fn rollup(&self) -> RollupService<RollupRepository> {
        RollupService::new(
            Arc::new(RollupRepository::new(self.connection())),
            RollupAggregator::from_config(&self.engine),
        )
    }

    /// Fiscal year service.
    #[must_use]
    pub fn years(&self) -> YearService<YearRepository> {
        YearService::new(Arc::new(YearRepository::new(self.connection())))
    }

    /// Catalog service.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<CatalogRepository> {
        CatalogService::new(Arc::new(CatalogRepository::new(self.connection())))
    }

    /// Procurement service.
    #[must_use]
    pub fn procurement(&self) -> ProcurementService<ProcurementRepository> {
        ProcurementService::new(Arc::new(ProcurementRepository::new(self.connection())))
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
