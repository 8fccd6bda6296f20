//! Service Configuration
//!
//! Loaded from a JSON file. Everything except `api_secret` has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration load failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Who runs this deployment, as reported by the `developer` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperInfo {
    #[serde(default = "default_developer_name")]
    pub name: String,

    #[serde(default = "default_developer_id")]
    pub id: String,
}

impl Default for DeveloperInfo {
    fn default() -> Self {
        Self {
            name: default_developer_name(),
            id: default_developer_id(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file (default: "./confinfo.sqlite")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Shared secret expected, base64-encoded, in bearer tokens (required)
    pub api_secret: String,

    /// Prefix stripped from request paths before routing
    #[serde(default)]
    pub base_path: String,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub developer: DeveloperInfo,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./confinfo.sqlite")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_developer_name() -> String {
    "Conference Information Team".to_string()
}

fn default_developer_id() -> String {
    "confinfo".to_string()
}

impl ServiceConfig {
    /// Defaults with the given secret
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            api_secret: api_secret.into(),
            base_path: String::new(),
            log_level: default_log_level(),
            developer: DeveloperInfo::default(),
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("api_secret must not be empty".into()));
        }

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "base_path must start with '/': '{}'",
                self.base_path
            )));
        }

        Ok(())
    }

    /// Same configuration listening on `port`
    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
