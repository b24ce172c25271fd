//! Configuration file handling for devsite
//!
//! Settings are layered: built-in defaults, then a YAML file, then
//! command-line overrides applied by the caller.
//!
//! The YAML file is taken from `--config`/`DEVSITE_CONFIG` when given (and must
//! exist), otherwise from `<config dir>/devsite/config.yaml` when present.

pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DevsiteError, Result};

pub use settings::{Elevation, Settings};

/// Settings filename inside the user config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Application directory name inside the user config directory
pub const APP_DIR: &str = "devsite";

/// Default location of the settings file, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Load settings, honoring an explicit path before the default location
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(DevsiteError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        return load_settings_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_settings_file(&path),
        _ => {
            log::debug!("no settings file found, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Load settings from a specific file
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    log::debug!("loading settings from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| DevsiteError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Settings::from_yaml(&content).map_err(|e| match e {
        DevsiteError::ConfigParseFailed { reason, .. } => DevsiteError::ConfigParseFailed {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}
