//! Configuration loading and management

use crate::core::error::{ConfigError, PizzeriaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., "127.0.0.1:8080")
    pub bind: String,

    /// Prefix every resource route is nested under (e.g., "/api")
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            base_path: "/api".to_string(),
        }
    }
}

/// Page size defaults for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_size: usize,
    pub max_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

/// Which entity store backs the API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Connection string, required by the postgres backend
    pub database_url: Option<String>,

    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            database_url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG` when set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,pizzeria=debug".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Every section has defaults, so an empty YAML document is a valid
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix of the alert headers (`X-{application_name}-Alert`)
    pub application_name: String,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "pizzeria".to_string(),
            server: ServerConfig::default(),
            pagination: PaginationConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> PizzeriaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> PizzeriaResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> PizzeriaResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `PIZZERIA_BIND`, `PIZZERIA_DATABASE_URL` and
    /// `PIZZERIA_LOG`
    ///
    /// A database URL implies the postgres backend.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("PIZZERIA_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("PIZZERIA_DATABASE_URL") {
            self.storage.database_url = Some(url);
            self.storage.backend = StorageBackend::Postgres;
        }
        if let Some(filter) = lookup("PIZZERIA_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> PizzeriaResult<()> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.pagination.max_size == 0 {
            return Err(invalid("pagination.max_size", "must be at least 1").into());
        }
        if self.pagination.default_size == 0
            || self.pagination.default_size > self.pagination.max_size
        {
            return Err(invalid(
                "pagination.default_size",
                "must be between 1 and pagination.max_size",
            )
            .into());
        }
        if !self.server.base_path.is_empty() && !self.server.base_path.starts_with('/') {
            return Err(invalid("server.base_path", "must start with '/'").into());
        }
        if self.application_name.trim().is_empty() {
            return Err(invalid("application_name", "must not be empty").into());
        }
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none()
        {
            return Err(invalid(
                "storage.database_url",
                "required by the postgres backend",
            )
            .into());
        }
        Ok(())
    }

    /// Base path without a trailing slash, empty for the root
    pub fn base_path(&self) -> &str {
        self.server.base_path.trim_end_matches('/')
    }
}
