//! Process configuration read from the environment.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use icm_core::{ClauseOrdering, IcmError};

/// Port used when `ICM_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// A configuration value could not be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a valid port")]
    InvalidPort { var: &'static str, value: String },

    #[error("invalid {var}: {value:?} is not a boolean")]
    InvalidFlag { var: &'static str, value: String },

    #[error("invalid ICM_CLAUSE_ORDER: {0}")]
    InvalidOrdering(#[source] IcmError),

    #[error("invalid ICM_LOG_FORMAT: {0:?} (expected \"text\" or \"json\")")]
    InvalidLogFormat(String),
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Runtime configuration for the API server.
#[derive(Clone)]
pub struct AppConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Postgres connection string. In-memory seed catalog when absent.
    pub database_url: Option<String>,
    /// Order of clauses within each standard in gap analysis output.
    pub clause_ordering: ClauseOrdering,
    /// Whether `/metrics` and the request middleware are enabled.
    pub metrics_enabled: bool,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("clause_ordering", &self.clause_ordering)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            clause_ordering: ClauseOrdering::default(),
            metrics_enabled: true,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read `ICM_PORT`, `DATABASE_URL`, `ICM_CLAUSE_ORDER`,
    /// `ICM_METRICS_ENABLED` and `ICM_LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and blank values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("ICM_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "ICM_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };
        let clause_ordering = match get("ICM_CLAUSE_ORDER") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidOrdering)?,
            None => defaults.clause_ordering,
        };
        let metrics_enabled = match get("ICM_METRICS_ENABLED") {
            Some(raw) => parse_flag("ICM_METRICS_ENABLED", &raw)?,
            None => defaults.metrics_enabled,
        };
        let log_format = match get("ICM_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            clause_ordering,
            metrics_enabled,
            log_format,
        })
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
    }
}
