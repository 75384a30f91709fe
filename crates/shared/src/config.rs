//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Engine configuration shared by the aggregation and allocation services.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Accepted distance between a pole percentage sum and 100.
    #[serde(default = "default_allocation_tolerance")]
    pub allocation_tolerance: Decimal,
    /// Hard cap on the number of buckets a rollup may return.
    #[serde(default = "default_rollup_max_buckets")]
    pub rollup_max_buckets: usize,
    /// Label of the bucket collecting records without a grouping value.
    #[serde(default = "default_other_bucket_label")]
    pub other_bucket_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allocation_tolerance: default_allocation_tolerance(),
            rollup_max_buckets: default_rollup_max_buckets(),
            other_bucket_label: default_other_bucket_label(),
        }
    }
}

fn default_allocation_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_rollup_max_buckets() -> usize {
    50
}

fn default_other_bucket_label() -> String {
    "Other".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETOPS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
