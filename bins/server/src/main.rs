//! Budgetops API Server
//!
//! Main entry point for the budget aggregation and reconciliation service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetops_api::{AppState, create_router};
use budgetops_db::connect_with_pool;
use budgetops_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetops=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    info!(
        tolerance = %config.engine.allocation_tolerance,
        max_buckets = config.engine.rollup_max_buckets,
        "Engine configured"
    );
    let state = AppState::new(db, config.engine);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
