mod config;

pub use config::{
    Config, CountdownConfig, EventConfig, ParallaxConfig, RevealConfig, ScrollConfig,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "INVITATION_CONFIG_DIR";

/// Returns `$INVITATION_CONFIG_DIR` if set, else `<config dir>/invitation/`.
///
/// # Errors
/// Returns an error if no configuration directory can be determined or if
/// creating it fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("invitation"),
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
