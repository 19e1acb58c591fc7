//! Configuration persistence
//!
//! The native shell stores [`AppConfig`] through `confy` under the
//! `skillhud` app name ([`load_config`] / [`save_config`], or the `_at`
//! variants for a portable install). [`load_file`] / [`save_file`] are the
//! strict versions that report every failure.

use std::fs;
use std::path::{Path, PathBuf};

use skillhud_types::AppConfig;
use thiserror::Error;

/// App name used for the platform config directory.
pub const APP_NAME: &str = "skillhud";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("config store error: {0}")]
    Store(#[from] confy::ConfyError),
}

/// Load a config from an explicit TOML file.
pub fn load_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a config to an explicit TOML file.
pub fn save_file(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Location of the config file in the platform config directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

/// Load the config stored at `path`, falling back to defaults if it is
/// unreadable. A missing file is created with the defaults.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config_at(path: &Path) -> AppConfig {
    confy::load_path(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = ?path, "Failed to load config, using defaults");
        AppConfig::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_config_at(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    confy::store_path(path, config)?;
    Ok(())
}

/// Load the stored config from the platform config directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> AppConfig {
    match config_path() {
        Ok(path) => load_config_at(&path),
        Err(e) => {
            tracing::warn!(error = %e, "No config directory, using defaults");
            AppConfig::default()
        }
    }
}

/// Persist the config to the platform config directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_at(&config_path()?, config)
}
