//! Process configuration read from the environment.

use crate::auth::AuthConfig;
use crate::logging::{self, LoggingConfig};
use crate::storage::{keys, StorageConfig};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_DB_FILE: &str = "planboard.sqlite3";

/// Invalid environment value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanboardConfig {
    pub db_path: PathBuf,
    /// Always absolute.
    pub log_dir: PathBuf,
    pub log_level: String,
    pub key_prefix: String,
    pub api_base_url: String,
    pub auth_latency: Duration,
}

impl PlanboardConfig {
    /// Reads `PLANBOARD_*` variables, falling back to defaults for unset
    /// ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PlanboardConfig::from_env`] with an injected variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get("PLANBOARD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        let log_dir = match get("PLANBOARD_LOG_DIR") {
            Some(raw) => absolute_dir("PLANBOARD_LOG_DIR", &raw)?,
            None => env::temp_dir().join("planboard-logs"),
        };

        let log_level = match get("PLANBOARD_LOG_LEVEL") {
            Some(raw) => logging::normalize_level(&raw)
                .map_err(|_| ConfigError {
                    key: "PLANBOARD_LOG_LEVEL",
                    value: raw.clone(),
                    reason: "expected trace|debug|info|warn|error",
                })?
                .to_string(),
            None => logging::default_log_level().to_string(),
        };

        let key_prefix =
            get("PLANBOARD_KEY_PREFIX").unwrap_or_else(|| keys::DEFAULT_PREFIX.to_string());

        let api_base_url = match get("PLANBOARD_API_BASE_URL") {
            Some(raw) if crate::utils::validation::is_valid_url(&raw) => {
                raw.trim_end_matches('/').to_string()
            }
            Some(raw) => {
                return Err(ConfigError {
                    key: "PLANBOARD_API_BASE_URL",
                    value: raw,
                    reason: "expected an absolute http(s) URL",
                })
            }
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let auth_latency = match get("PLANBOARD_AUTH_LATENCY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError {
                    key: "PLANBOARD_AUTH_LATENCY_MS",
                    value: raw.clone(),
                    reason: "expected milliseconds as a non-negative integer",
                })?,
            None => AuthConfig::default().simulated_latency,
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
            key_prefix,
            api_base_url,
            auth_latency,
        })
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            key_prefix: self.key_prefix.clone(),
            ..StorageConfig::default()
        }
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            simulated_latency: self.auth_latency,
            ..AuthConfig::default()
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig::new(self.log_level.clone(), self.log_dir.clone())
    }
}

fn absolute_dir(key: &'static str, raw: &str) -> Result<PathBuf, ConfigError> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path).map_err(|_| ConfigError {
        key,
        value: raw.to_string(),
        reason: "cannot resolve against the working directory",
    })
}
