use std::path::PathBuf;

use crate::cli::commands::Cli;
use crate::io::config_io::{self, ConfigError};
use crate::io::storage;
use crate::logging;
use crate::model::config::{AppConfig, UiConfig};

/// Effective runtime settings: command-line flags layered over config.toml
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub slot: String,
    pub log_filter: String,
    pub ui: UiConfig,
}

/// Read the config file named by `--config` (or the default) and merge flags.
/// A slot name that cannot be used as a storage key is rejected here.
pub fn resolve(cli: &Cli) -> Result<Settings, ConfigError> {
    let config = match &cli.config {
        Some(path) => config_io::read_config_from(path)?,
        None => config_io::read_config()?,
    };
    let settings = merge(cli, config);
    storage::validate_key(&settings.slot).map_err(|source| ConfigError::InvalidSlot {
        slot: settings.slot.clone(),
        source,
    })?;
    Ok(settings)
}

/// Flags win over config values, config wins over built-in defaults
pub fn merge(cli: &Cli, config: AppConfig) -> Settings {
    let data_dir = cli
        .data_dir
        .clone()
        .or(config.storage.data_dir)
        .unwrap_or_else(config_io::default_data_dir);
    Settings {
        data_dir,
        slot: config.storage.slot,
        log_filter: logging::resolve_filter(cli.log_level.as_deref(), &config.log.level),
        ui: config.ui,
    }
}
