//! Core error types for invitation-core.
//!
//! Missing page elements are never errors: every component disables itself
//! quietly when its bindings are absent. The types here cover what can
//! actually fail, which is configuration and user-supplied input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for invitation-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No usable configuration directory
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Selector text not understood
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Date-time text not understood
    #[error("Invalid date-time '{input}': expected YYYY-MM-DDTHH:MM:SS")]
    InvalidDateTime { input: String },

    /// Local time skipped by a daylight-saving transition
    #[error("Local time {0} does not exist in the current timezone")]
    NonexistentLocalTime(chrono::NaiveDateTime),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("event.venue".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: event.venue"
        );
    }

    #[test]
    fn invalid_date_time_message_names_format() {
        let err = ValidationError::InvalidDateTime {
            input: "next tuesday".into(),
        };
        assert!(err.to_string().contains("YYYY-MM-DDTHH:MM:SS"));
    }
}
