//! Error types for the settings crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A configuration validation error occurred.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Errors related to configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No API key was configured anywhere.
    #[error("OctoPrint API key required")]
    MissingApiKey,

    /// The resolution is not `WIDTHxHEIGHT`.
    #[error("Screen resolution invalid: {0}")]
    InvalidResolution(String),

    /// The server URL is not http(s).
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// A configuration value is out of valid range.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingApiKey.to_string(),
            "OctoPrint API key required"
        );
        assert_eq!(
            ConfigError::InvalidResolution("480-320".into()).to_string(),
            "Screen resolution invalid: 480-320"
        );
    }

    #[test]
    fn test_error_conversion() {
        let settings_err: SettingsError = ConfigError::MissingApiKey.into();
        assert!(matches!(settings_err, SettingsError::Config(_)));
        assert_eq!(settings_err.to_string(), "OctoPrint API key required");

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let settings_err: SettingsError = io_err.into();
        assert!(matches!(settings_err, SettingsError::IoError(_)));
    }
}
