//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_BASE_URL` - Base URL of the remote catalog/stock service
//!
//! ## Optional
//! - `CART_STORAGE_PATH` - Durable cart storage file (default: cart.json)
//! - `CART_HTTP_TIMEOUT_SECS` - Remote request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_STORAGE_PATH: &str = "cart.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart library configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the remote catalog/stock service
    pub api_base_url: String,
    /// File path backing the durable key-value store
    pub storage_path: PathBuf,
    /// Timeout applied to every remote request
    pub http_timeout: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("CART_API_BASE_URL")?;
        let storage_path =
            PathBuf::from(get_env_or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let http_timeout = parse_timeout_secs(&get_env_or_default(
            "CART_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("CART_HTTP_TIMEOUT_SECS".to_string(), e))?;

        Ok(Self {
            api_base_url,
            storage_path,
            http_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a positive number of seconds into a `Duration`.
fn parse_timeout_secs(value: &str) -> Result<Duration, String> {
    let secs = value.parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_valid() {
        assert_eq!(parse_timeout_secs("30").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_timeout_rejects_zero() {
        assert!(parse_timeout_secs("0").is_err());
    }

    #[test]
    fn test_parse_timeout_rejects_garbage() {
        assert!(parse_timeout_secs("soon").is_err());
        assert!(parse_timeout_secs("-5").is_err());
    }

    #[test]
    #[allow(unsafe_code)] // env::set_var is unsafe in edition 2024
    fn test_from_env_round_trip() {
        // Set and clear env vars in a single test to avoid races with
        // parallel tests mutating the process environment.
        unsafe {
            std::env::set_var("CART_API_BASE_URL", "http://localhost:3333");
            std::env::set_var("CART_STORAGE_PATH", "/tmp/rocket-cart-test.json");
            std::env::set_var("CART_HTTP_TIMEOUT_SECS", "5");
        }

        let config = CartConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(
            config.storage_path,
            PathBuf::from("/tmp/rocket-cart-test.json")
        );
        assert_eq!(config.http_timeout, Duration::from_secs(5));

        unsafe {
            std::env::remove_var("CART_API_BASE_URL");
            std::env::remove_var("CART_STORAGE_PATH");
            std::env::remove_var("CART_HTTP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("CART_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CART_API_BASE_URL"
        );
    }
}
