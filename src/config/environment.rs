//! Environment configuration
//!
//! Read once at startup from the process environment (after `dotenvy` has
//! loaded `.env`). Bad values are reported as `ConfigError` instead of
//! panicking.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::AvailabilityPolicy;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}' (expected postgres or memory)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub availability_policy: AvailabilityPolicy,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_origins: Vec::new(),
            upload_dir: "uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            availability_policy: AvailabilityPolicy::default(),
        }
    }
}

fn parsed<T, E>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = E>,
    E: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: E| ConfigError::Invalid {
            name,
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; used by `from_env` and by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let store_backend = parsed("STORE_BACKEND", lookup("STORE_BACKEND"), StoreBackend::Postgres)?;
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing { name: "DATABASE_URL" });
        }

        let max_upload_bytes = parsed("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), defaults.max_upload_bytes)?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            environment: text("ENVIRONMENT", defaults.environment),
            host: text("HOST", defaults.host),
            port: parsed("PORT", lookup("PORT"), defaults.port)?,
            store_backend,
            database_url,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            upload_dir: text("UPLOAD_DIR", defaults.upload_dir),
            max_upload_bytes,
            availability_policy: parsed(
                "ASSIGNMENT_AVAILABILITY_POLICY",
                lookup("ASSIGNMENT_AVAILABILITY_POLICY"),
                defaults.availability_policy,
            )?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn memory_backend_needs_nothing_else() {
        let config = EnvironmentConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert_eq!(config.availability_policy, AvailabilityPolicy::Reserve);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.cors_origins.is_empty());
        assert!(config.is_development());
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = EnvironmentConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { name: "DATABASE_URL" });

        let config = EnvironmentConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/fleet")])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = EnvironmentConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = EnvironmentConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("ASSIGNMENT_AVAILABILITY_POLICY", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "ASSIGNMENT_AVAILABILITY_POLICY", .. }));
    }

    #[test]
    fn overrides_are_applied() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://localhost:3000, https://admin.example.com ,"),
            ("ASSIGNMENT_AVAILABILITY_POLICY", "legacy"),
            ("UPLOAD_DIR", "/var/lib/fleet/uploads"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "https://admin.example.com"]);
        assert_eq!(config.availability_policy, AvailabilityPolicy::Legacy);
        assert_eq!(config.upload_dir, "/var/lib/fleet/uploads");
    }
}
