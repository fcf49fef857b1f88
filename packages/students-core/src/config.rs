//! Service configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// `host:port` to bind
    pub address: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8082".to_string(),
        }
    }
}

/// Service configuration, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment label (dev, staging, production)
    pub env: String,
    /// SQLite database file
    pub storage_path: PathBuf,
    /// Listener settings
    pub http_server: HttpServerConfig,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Grace period for in-flight connections at shutdown, in milliseconds
    pub shutdown_grace_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "dev".to_string(),
            storage_path: PathBuf::from("storage/storage.db"),
            http_server: HttpServerConfig::default(),
            request_timeout_ms: 5000,
            shutdown_grace_ms: 5000,
        }
    }
}

impl AppConfig {
    /// Reads and validates a TOML config file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage_path must not be empty".into()));
        }
        if self.http_server.address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "http_server.address must not be empty".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.shutdown_grace_ms == 0 {
            return Err(ConfigError::Invalid(
                "shutdown_grace_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
