//! Configuration loader for the `sensorcast` backend service.
//!
//! All runtime configuration values and their defaults live here, loaded from
//! environment variables (with optional `.env` file support provided by the
//! caller), so no other module needs to call `env::var` directly.
//!
use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional port environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// TCP port the HTTP server binds to on all interfaces.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `PORT` – HTTP listen port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let db_pool_max = parse_env_u32!("DB_POOL_MAX", 5);
    let port = parse_env_u16!("PORT", 8080);

    Ok(Config {
        db_url,
        db_pool_max,
        port,
    })
}

impl Config {
    /// Log the loaded configuration, with the database password masked.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL : {}", self.masked_db_url());
        tracing::info!("  DB_POOL_MAX  : {}", self.db_pool_max);
        tracing::info!("  PORT         : {}", self.port);
    }

    /// The database URL with the password replaced by `****`.
    pub fn masked_db_url(&self) -> String {
        // ---
        let Some(at_pos) = self.db_url.rfind('@') else {
            return self.db_url.clone();
        };
        let credentials = &self.db_url[..at_pos];

        // A colon that is part of the `scheme://` prefix is not a password separator.
        match credentials.rfind(':') {
            Some(colon_pos) if !credentials[colon_pos..].starts_with("://") => format!(
                "{}:****{}",
                &self.db_url[..colon_pos],
                &self.db_url[at_pos..]
            ),
            _ => self.db_url.clone(),
        }
    }
}
