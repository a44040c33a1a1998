//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,

    /// Path to the SQLite products database
    pub database_path: PathBuf,
    /// Create the database file and products table when missing
    pub database_create: bool,
    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // PORT wins over SERVER_ADDR when both are set
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let database_create = match lookup("DATABASE_CREATE") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("DATABASE_CREATE"))?,
        };

        let log_json = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => 4,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("DB_MAX_CONNECTIONS"))?,
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            None => 30,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json,

            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("scanprods.db")),
            database_create,
            db_max_connections,

            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.database_path, PathBuf::from("scanprods.db"));
        assert!(!config.database_create);
        assert_eq!(config.db_max_connections, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = config_from(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("SERVER_ADDR", "nope")]),
            Err(ConfigError::InvalidAddress)
        ));
        assert!(matches!(
            config_from(&[("DATABASE_CREATE", "maybe")]),
            Err(ConfigError::Invalid("DATABASE_CREATE"))
        ));
        assert!(matches!(
            config_from(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid("DB_MAX_CONNECTIONS"))
        ));
        assert!(matches!(
            config_from(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid("LOG_FORMAT"))
        ));
    }

    #[test]
    fn json_log_format() {
        assert!(config_from(&[("LOG_FORMAT", "json")]).unwrap().log_json);
    }

    #[test]
    fn database_create_accepts_common_spellings() {
        assert!(config_from(&[("DATABASE_CREATE", "true")]).unwrap().database_create);
        assert!(config_from(&[("DATABASE_CREATE", "1")]).unwrap().database_create);
        assert!(!config_from(&[("DATABASE_CREATE", "off")]).unwrap().database_create);
    }
}
