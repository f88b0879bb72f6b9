//! services/portal/src/config.rs
//!
//! Defines the portal's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

use crate::admin::notifications::{DEFAULT_POLL_INTERVAL, DEFAULT_WINDOW};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote visitor directory the portal talks to.
    pub directory_url: String,
    /// Address the development directory server listens on.
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub poll_interval: Duration,
    pub notification_window: usize,
    /// Shared secret the development directory server checks.
    pub admin_password: String,
    pub cors_origin: Option<String>,
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

        // --- Remote Directory and Server Settings ---
        let directory_url = std::env::var("DIRECTORY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:4000".to_string());
        if !directory_url.starts_with("http://") && !directory_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "DIRECTORY_URL".to_string(),
                format!("'{}' is not an http(s) URL", directory_url),
            ));
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Notification Feed Settings ---
        let poll_interval = match std::env::var("NOTIFICATION_POLL_MS") {
            Ok(raw) => Duration::from_millis(parse_positive::<u64>("NOTIFICATION_POLL_MS", &raw)?),
            Err(_) => DEFAULT_POLL_INTERVAL,
        };
        let notification_window = match std::env::var("NOTIFICATION_WINDOW") {
            Ok(raw) => parse_positive::<usize>("NOTIFICATION_WINDOW", &raw)?,
            Err(_) => DEFAULT_WINDOW,
        };

        // --- Directory Server Settings ---
        let admin_password =
            admin_password_from(std::env::var("DIRECTORY_ADMIN_PASSWORD").ok())?;
        let cors_origin = std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty());

        Ok(Self {
            directory_url,
            bind_address,
            log_level,
            poll_interval,
            notification_window,
            admin_password,
            cors_origin,
        })
    }
}

/// The directory server's password; unset falls back to the shared secret.
fn admin_password_from(raw: Option<String>) -> Result<String, ConfigError> {
    match raw {
        None => Ok(crate::admin::ADMIN_PASSWORD.to_string()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(
            "DIRECTORY_ADMIN_PASSWORD".to_string(),
            "must not be blank".to_string(),
        )),
        Some(value) => Ok(value),
    }
}

/// Parses a strictly positive number out of an environment variable value.
fn parse_positive<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let value = raw.trim().parse::<T>().map_err(|_| {
        ConfigError::InvalidValue(name.to_string(), format!("'{}' is not a number", raw))
    })?;
    if value <= T::default() {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_values() {
        assert_eq!(parse_positive::<u64>("N", " 30000 ").unwrap(), 30_000);
        assert_eq!(parse_positive::<usize>("N", "10").unwrap(), 10);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(
            parse_positive::<u64>("NOTIFICATION_POLL_MS", "0"),
            Err(ConfigError::InvalidValue(name, _)) if name == "NOTIFICATION_POLL_MS"
        ));
        assert!(parse_positive::<usize>("NOTIFICATION_WINDOW", "ten").is_err());
        assert!(parse_positive::<usize>("NOTIFICATION_WINDOW", "-1").is_err());
    }

    #[test]
    fn blank_admin_password_is_an_invalid_value() {
        assert_eq!(admin_password_from(None).unwrap(), "CUTOUT");
        assert_eq!(admin_password_from(Some("s3cret".to_string())).unwrap(), "s3cret");
        assert!(matches!(
            admin_password_from(Some("  ".to_string())),
            Err(ConfigError::InvalidValue(name, _)) if name == "DIRECTORY_ADMIN_PASSWORD"
        ));
    }
}
