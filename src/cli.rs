//! Command-line arguments accepted by an executor binary.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{ConfigOverrides, CONFIG_FILE_ENV};

/// Step execution backend for the AltWalker driver
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about = "Serve registered models to the AltWalker driver", long_about = None)]
pub struct ExecutorArgs {
    /// Address to listen on, as `host:port` or `http://host:port`
    #[arg(long, visible_alias = "urls", value_name = "URL")]
    pub url: Option<String>,

    /// Configuration file (TOML or YAML)
    #[arg(short, long, value_name = "PATH", env = CONFIG_FILE_ENV)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `altwalker_executor=debug`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl ExecutorArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            bind_address: self.url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
