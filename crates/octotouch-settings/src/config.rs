//! Kiosk configuration
//!
//! `Config` is built once at startup by layering, lowest first:
//! - built-in defaults
//! - the discovered OctoPrint `config.yaml`
//! - the file given with `--config`
//! - command-line flags
//!
//! and is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use crate::octoprint::read_octoprint_config;

/// Display size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
        }
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Validated, read-only kiosk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// OctoPrint API key
    pub api_key: String,
    /// Server host, used when no explicit URL is given
    pub host: String,
    /// Server port, used when no explicit URL is given
    pub port: u16,
    /// Explicit server URL, overrides host and port
    pub url: Option<String>,
    /// Display size
    pub resolution: Resolution,
    /// Name of the default temperature preset
    pub preset: String,
}

impl Config {
    /// URL requests are made against.
    pub fn base_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if self.port == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "port".to_string(),
                value: self.port.to_string(),
            });
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ConfigError::InvalidResolution(self.resolution.to_string()));
        }

        let url = self.base_url();
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ConfigError::InvalidUrl(url)),
        }
    }
}

/// Partial configuration read from one source. Missing fields leave the
/// lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverlay {
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub url: Option<String>,
    /// `WIDTHxHEIGHT`
    pub resolution: Option<String>,
    pub preset: Option<String>,
}

/// Read a `--config` file.
///
/// `.toml` and `.json` files are kiosk configs carrying `ConfigOverlay`
/// fields; anything else is read as an OctoPrint `config.yaml`.
pub fn load_config_file(path: &Path) -> SettingsResult<ConfigOverlay> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SettingsError::LoadError(format!("Cannot read config file: {e}"))
            })?;
            Ok(toml::from_str(&content)?)
        }
        Some("json") => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SettingsError::LoadError(format!("Cannot read config file: {e}"))
            })?;
            Ok(serde_json::from_str(&content)?)
        }
        _ => read_octoprint_config(path),
    }
}

/// Layered construction of `Config`.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    host: String,
    port: u16,
    url: Option<String>,
    resolution: Option<String>,
    preset: String,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            host: "localhost".to_string(),
            port: 5000,
            url: None,
            resolution: None,
            preset: "PLA".to_string(),
        }
    }
}

impl ConfigBuilder {
    /// Start from the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a partial configuration on top.
    pub fn merge(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(key) = overlay.api_key {
            self.api_key = Some(key);
        }
        if let Some(host) = overlay.host {
            self.host = host;
        }
        if let Some(port) = overlay.port {
            self.port = port;
        }
        if let Some(url) = overlay.url {
            self.url = Some(url);
        }
        if let Some(resolution) = overlay.resolution {
            self.resolution = Some(resolution);
        }
        if let Some(preset) = overlay.preset {
            self.preset = preset;
        }
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an explicit server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the display resolution as `WIDTHxHEIGHT`
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Set the default temperature preset
    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> ConfigResult<Config> {
        let resolution = match self.resolution {
            Some(text) => text.parse()?,
            None => Resolution::default(),
        };

        let config = Config {
            api_key: self.api_key.unwrap_or_default(),
            host: self.host,
            port: self.port,
            url: self.url.map(|u| u.trim_end_matches('/').to_string()),
            resolution,
            preset: self.preset,
        };

        config.validate()?;
        Ok(config)
    }
}
