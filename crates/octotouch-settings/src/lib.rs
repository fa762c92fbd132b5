//! OctoTouch Settings Crate
//!
//! Builds the immutable `Config` the kiosk runs with, from defaults, the
//! local OctoPrint `config.yaml`, an optional kiosk config file and
//! command-line overrides.

pub mod config;
pub mod error;
pub mod octoprint;

pub use config::{load_config_file, Config, ConfigBuilder, ConfigOverlay, Resolution};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use octoprint::{find_octoprint_config, read_octoprint_config};
