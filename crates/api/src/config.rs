//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `BULKPARTS_HOST` - Bind address (default: 0.0.0.0)
//! - `BULKPARTS_PORT` - Listen port (default: 8080)
//! - `JWT_SECRET` - HS256 token secret (default: insecure dev secret, logged as a warning)
//! - `DATABASE_URL` - `PostgreSQL` connection string; unset means an in-memory catalog
//! - `BULKPARTS_ALLOW_CREATE` - Initial `ALLOW_CREATE` setting (default: true)
//! - `BULKPARTS_DEFAULT_STOCK_LOCATION_ID` - Initial default stock location (default: 0 = none)
//! - `BULKPARTS_PART_URL_PREFIX` - Prefix of created part URLs (default: `/part/`, empty disables)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use bulkparts_infra::PluginSettings;

pub const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_PART_URL_PREFIX: &str = "/part/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: SecretString,
    /// `true` when `JWT_SECRET` was not set.
    pub jwt_secret_is_default: bool,
    pub database_url: Option<SecretString>,
    /// Seed for the settings store.
    pub settings: PluginSettings,
    pub part_url_prefix: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "BULKPARTS_HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "BULKPARTS_PORT", 8080u16)?;

        let (jwt_secret, jwt_secret_is_default) = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => (SecretString::from(secret), false),
            None => (SecretString::from(DEV_JWT_SECRET), true),
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        let allow_create = match lookup("BULKPARTS_ALLOW_CREATE") {
            Some(raw) => parse_bool("BULKPARTS_ALLOW_CREATE", &raw)?,
            None => true,
        };

        let default_stock_location_id = parse_or(&lookup, "BULKPARTS_DEFAULT_STOCK_LOCATION_ID", 0i64)?;
        if default_stock_location_id < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BULKPARTS_DEFAULT_STOCK_LOCATION_ID".to_string(),
                "must be >= 0".to_string(),
            ));
        }

        let part_url_prefix = match lookup("BULKPARTS_PART_URL_PREFIX") {
            Some(prefix) if prefix.is_empty() => None,
            Some(prefix) => Some(prefix),
            None => Some(DEFAULT_PART_URL_PREFIX.to_string()),
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            jwt_secret_is_default,
            database_url,
            settings: PluginSettings {
                allow_create,
                default_stock_location_id,
            },
            part_url_prefix,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
