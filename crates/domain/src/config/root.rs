use super::backend::MAX_TIMEOUT_SECS;
use super::{
    BackendConfig, CacheConfig, ConfigError, DatabaseConfig, LoggingConfig, PaginationConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from `path` (defaults when `None`) and apply CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.backend.timeout_secs == 0 || self.backend.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "backend.timeout_secs must be within 1..={}, got {}",
                MAX_TIMEOUT_SECS, self.backend.timeout_secs
            )));
        }

        if self.cache.max_entries == 0 || self.cache.max_cost_bytes == 0 {
            return Err(ConfigError::Validation(
                "cache ceilings must be greater than zero".to_string(),
            ));
        }

        if self.cache.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::Validation(
                "pagination.page_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
