//! Configuration module for the Match-3 backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "./data/match3.sqlite";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Maximum number of pooled SQLite connections
    pub db_max_connections: u32,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

/// A configuration variable that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} value {:?}: expected {}",
            self.key, self.value, self.expected
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables (and a `.env` file, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("MATCH3_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
            .into();

        let db_max_connections = match lookup("MATCH3_DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        key: "MATCH3_DB_MAX_CONNECTIONS",
                        value: raw,
                        expected: "a positive integer",
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let raw_addr = lookup("MATCH3_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|_| ConfigError {
            key: "MATCH3_BIND_ADDR",
            value: raw_addr.clone(),
            expected: "a socket address such as 127.0.0.1:8080",
        })?;

        let log_level = lookup("MATCH3_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("MATCH3_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError {
                key: "MATCH3_LOG_FORMAT",
                value: raw,
                expected: "text or json",
            })?,
            None => LogFormat::Text,
        };

        Ok(Self {
            db_path,
            db_max_connections,
            bind_addr,
            log_level,
            log_format,
        })
    }
}
