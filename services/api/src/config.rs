//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use skill_swap_core::DEFAULT_MUTATION_ATTEMPTS;
use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_level: Level,
    /// `None` allows any origin.
    pub cors_allow_origin: Option<HeaderValue>,
    pub mutation_attempts: usize,
    pub max_body_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address: SocketAddr =
            parse_or(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS.parse().ok())?;
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;
        let cors_allow_origin = lookup("CORS_ALLOW_ORIGIN")
            .filter(|v| !v.trim().is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin.trim()).map_err(|e| {
                    ConfigError::InvalidValue("CORS_ALLOW_ORIGIN".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let max_body_bytes = parse_or(&lookup, "MAX_BODY_BYTES", Some(DEFAULT_MAX_BODY_BYTES))?;

        // --- Database Settings ---
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let database_max_connections = parse_or(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            Some(DEFAULT_MAX_CONNECTIONS),
        )?;

        // --- Store Settings ---
        let mutation_attempts = parse_or(
            &lookup,
            "MUTATION_ATTEMPTS",
            Some(DEFAULT_MUTATION_ATTEMPTS),
        )?;
        if mutation_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "MUTATION_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            cors_allow_origin,
            mutation_attempts,
            max_body_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => default.ok_or_else(|| ConfigError::MissingVar(key.to_string())),
    }
}
