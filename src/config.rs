use std::net::SocketAddr;

use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================
//
// Read once at startup from the environment, with an optional `.env` file.
//
//   DATABASE_URL              required unless STORE=memory
//   STORE                     postgres | memory (default: postgres)
//   DATABASE_MAX_CONNECTIONS  default: 5
//   HTTP_BIND                 default: 0.0.0.0:8080
//   METRICS_PORT              default: 9090
//   KAFKA_BROKERS             optional; unset means events are only logged
//
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreKind,
    /// `None` only for the in-memory store
    pub database: Option<DatabaseConfig>,
    pub http_bind: SocketAddr,
    pub metrics_port: u16,
    pub kafka_brokers: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match get("STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue { key: "STORE", value: other.to_string() })
            }
        };

        let database = match (store, get("DATABASE_URL")) {
            (_, Some(url)) => Some(DatabaseConfig {
                url,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5)?,
            }),
            (StoreKind::Postgres, None) => return Err(ConfigError::Missing("DATABASE_URL")),
            (StoreKind::Memory, None) => None,
        };

        let http_bind = parse_or("HTTP_BIND", get("HTTP_BIND"), SocketAddr::from(([0, 0, 0, 0], 8080)))?;
        let metrics_port = parse_or("METRICS_PORT", get("METRICS_PORT"), 9090)?;

        Ok(Self {
            store,
            database,
            http_bind,
            metrics_port,
            kafka_brokers: get("KAFKA_BROKERS"),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
