//! Server configuration loaded from the environment
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{Context, Result};

/// Default TCP port when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Default SQLite file when `DB_FILE` is not set.
const DEFAULT_DB_FILE: &str = "greenthumb.sqlite";

/// Default lifetime of a login session in hours.
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Application configuration.
///
/// Built once at startup from environment variables (a `.env` file is loaded
/// first by the binary). The upstream API keys are optional: the server runs
/// without them and the identification routes report a configuration error
/// when called.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to, e.g. `127.0.0.1:3000`.
    pub bind_addr: String,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// plant.id API key for the identification proxy.
    pub plant_id_api_key: Option<String>,
    /// Trefle API key for the supplemental-details proxy.
    pub trefle_api_key: Option<String>,
    /// Hours a login session stays valid.
    pub session_ttl_hours: i64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let session_ttl_hours = match std::env::var("SESSION_TTL_HOURS") {
            Ok(raw) => {
                let hours = raw
                    .parse::<i64>()
                    .with_context(|| format!("SESSION_TTL_HOURS is not a number: {raw}"))?;
                anyhow::ensure!(hours > 0, "SESSION_TTL_HOURS must be positive");
                hours
            }
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            database_path: std::env::var("DB_FILE").unwrap_or_else(|_| DEFAULT_DB_FILE.to_string()),
            plant_id_api_key: std::env::var("PLANT_ID_API_KEY").ok().filter(|k| !k.is_empty()),
            trefle_api_key: std::env::var("TREFLE_API_KEY").ok().filter(|k| !k.is_empty()),
            session_ttl_hours,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{DEFAULT_PORT}"),
            database_path: DEFAULT_DB_FILE.to_string(),
            plant_id_api_key: None,
            trefle_api_key: None,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.database_path, "greenthumb.sqlite");
        assert!(config.plant_id_api_key.is_none());
        assert!(config.trefle_api_key.is_none());
        assert_eq!(config.session_ttl_hours, 24);
    }
}
