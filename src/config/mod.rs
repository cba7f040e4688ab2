//! Service configuration
//!
//! Environment variables and the PostgreSQL pool settings.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{ConfigError, EnvironmentConfig, StoreBackend};
