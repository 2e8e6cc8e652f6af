//! # Executor Configuration
//!
//! Layered configuration for the executor service: serde defaults, an optional TOML/YAML
//! file, `ALTWALKER_*` environment variables, then command-line overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use altwalker_executor::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let bind_address = &manager.config().server.bind_address;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use crate::constants::DEFAULT_BIND_ADDRESS;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// HTTP gateway settings
    pub server: ServerConfig,

    /// Step output capture settings
    pub trace: TraceConfig,

    /// Process-wide logging settings
    pub logging: LoggingConfig,
}

/// HTTP gateway configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

/// Step output capture configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Least severe event level captured into a step's output
    pub level: String,

    /// Re-emit captured step output to the process log after each step
    pub forward_to_log: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            level: "trace".to_string(),
            forward_to_log: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; falls back to an environment-specific default
    pub level: Option<String>,

    /// Directory for JSON log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl ExecutorConfig {
    /// Validate values that serde cannot check on its own
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.listen_address()?;
        self.trace.level_filter()?;
        Ok(())
    }
}

impl ServerConfig {
    /// `host:port` to bind, accepting the `http://host:port/` form drivers pass around
    pub fn listen_address(&self) -> ConfigResult<String> {
        let address = self
            .bind_address
            .trim()
            .trim_start_matches("http://")
            .trim_end_matches('/');

        let invalid = |context: &str| {
            ConfigurationError::invalid_value(
                "server.bind_address",
                self.bind_address.clone(),
                context.to_string(),
            )
        };

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected host:port"))?;
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(invalid("missing or malformed host"));
        }
        port.parse::<u16>()
            .map_err(|e| invalid(&format!("invalid port ({e})")))?;

        Ok(address.to_string())
    }
}

impl TraceConfig {
    pub fn level_filter(&self) -> ConfigResult<LevelFilter> {
        self.level.parse::<LevelFilter>().map_err(|e| {
            ConfigurationError::invalid_value("trace.level", self.level.clone(), e.to_string())
        })
    }
}
