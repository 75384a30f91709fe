//! Shared identifiers, errors, and configuration for Budgetops.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for tenant-scoped entity references
//! - Entity kinds used when reporting dangling or blocking references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, EngineConfig};
pub use error::{AppError, AppResult};
