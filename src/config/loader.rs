//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate. Sources are merged
//! in increasing priority: serde defaults, optional configuration file, `ALTWALKER_*`
//! environment variables, explicit overrides (usually from the command line).

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::ExecutorConfig;
use crate::constants::ENV_PREFIX;

/// Environment variable naming a configuration file
pub const CONFIG_FILE_ENV: &str = "ALTWALKER_CONFIG";

/// Highest-priority values, typically parsed from command-line arguments
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

/// Loaded and validated executor configuration
#[derive(Debug)]
pub struct ConfigManager {
    config: ExecutorConfig,
    environment: String,
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_overrides(&ConfigOverrides::default())
    }

    /// Load configuration, applying `overrides` on top of every other source
    pub fn load_with_overrides(overrides: &ConfigOverrides) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        let config_file = overrides
            .config_file
            .clone()
            .or_else(|| env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));

        debug!(
            environment = %environment,
            config_file = ?config_file,
            "Loading executor configuration"
        );

        let mut builder = Config::builder();
        if let Some(path) = &config_file {
            if !path.is_file() {
                return Err(ConfigurationError::ConfigFileNotFound { path: path.clone() });
            }
            builder = builder.add_source(File::from(path.as_path()));
        }

        let config: ExecutorConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.bind_address", overrides.bind_address.clone())?
            .set_override_option("logging.level", overrides.log_level.clone())?
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            bind_address = %config.server.bind_address,
            trace_level = %config.trace.level,
            forward_to_log = config.trace.forward_to_log,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_file,
        }))
    }

    /// Wrap an already-built configuration after validating it
    pub fn from_config(config: ExecutorConfig) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: Self::detect_environment(),
            config_file: None,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Configuration file that contributed to this configuration, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    fn detect_environment() -> String {
        env::var("ALTWALKER_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}
