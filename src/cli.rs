//! Command-line interface

use std::path::{Path, PathBuf};

use clap::Parser;
use octotouch_settings::{
    find_octoprint_config, load_config_file, read_octoprint_config, Config, ConfigBuilder,
    ConfigOverlay,
};

use crate::LogOptions;

#[derive(Debug, Parser)]
#[command(name = "octotouch", version)]
#[command(about = "Touchscreen client for OctoPrint", long_about = None)]
pub struct Cli {
    /// OctoPrint server URL, e.g. http://octopi.local:5000
    pub server: Option<String>,

    /// OctoPrint API key
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Log level
    #[arg(
        short = 'l',
        long = "loglevel",
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub loglevel: String,

    /// Log to this file instead of stdout
    #[arg(short = 'f', long = "log")]
    pub log: Option<PathBuf>,

    /// Screen resolution as WIDTHxHEIGHT
    #[arg(short = 'r', long)]
    pub resolution: Option<String>,

    /// Kiosk config (.toml, .json) or an OctoPrint config.yaml
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Default temperature preset
    #[arg(short = 'p', long)]
    pub preset: Option<String>,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.loglevel.clone(),
            file: self.log.clone(),
        }
    }

    /// Values given on the command line.
    pub fn overlay(&self) -> ConfigOverlay {
        ConfigOverlay {
            api_key: self.key.clone(),
            url: self.server.clone(),
            resolution: self.resolution.clone(),
            preset: self.preset.clone(),
            ..Default::default()
        }
    }

    /// Build the configuration from the local OctoPrint install, the
    /// `--config` file and the flags, in that order.
    pub fn build_config(&self) -> anyhow::Result<Config> {
        self.build_config_with(find_octoprint_config().as_deref())
    }

    pub fn build_config_with(&self, octoprint_config: Option<&Path>) -> anyhow::Result<Config> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = octoprint_config {
            match read_octoprint_config(path) {
                Ok(overlay) => {
                    tracing::info!("Read OctoPrint config from {}", path.display());
                    builder = builder.merge(overlay);
                }
                Err(e) => tracing::warn!("Ignoring {}: {e}", path.display()),
            }
        }

        if let Some(path) = &self.config {
            tracing::info!("Loading config file {}", path.display());
            builder = builder.merge(load_config_file(path)?);
        }

        Ok(builder.merge(self.overlay()).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("octotouch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse(&["-k", "abc", "-r", "800x480", "-p", "ABS", "http://octopi.local"]);
        assert_eq!(cli.server.as_deref(), Some("http://octopi.local"));
        assert_eq!(cli.key.as_deref(), Some("abc"));
        assert_eq!(cli.loglevel, "warn");
        assert_eq!(cli.resolution.as_deref(), Some("800x480"));
        assert_eq!(cli.preset.as_deref(), Some("ABS"));
    }

    #[test]
    fn test_unknown_loglevel_is_rejected() {
        let result = Cli::try_parse_from(["octotouch", "-l", "verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_key = \"from-file\"\npreset = \"PETG\"").unwrap();

        let path = file.path().display().to_string();
        let cli = parse(&["-c", &path, "-k", "from-flag"]);
        let config = cli.build_config_with(None).unwrap();
        assert_eq!(config.api_key, "from-flag");
        assert_eq!(config.preset, "PETG");
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_octoprint_config_is_lowest_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api:\n  key: yaml-key\nserver:\n  port: 8080\n").unwrap();

        let cli = parse(&[]);
        let config = cli.build_config_with(Some(&path)).unwrap();
        assert_eq!(config.api_key, "yaml-key");
        assert_eq!(config.base_url(), "http://localhost:8080");

        let cli = parse(&["-k", "flag-key"]);
        let config = cli.build_config_with(Some(&path)).unwrap();
        assert_eq!(config.api_key, "flag-key");
    }

    #[test]
    fn test_missing_key_fails() {
        let cli = parse(&[]);
        let err = cli.build_config_with(None).unwrap_err();
        assert_eq!(err.to_string(), "OctoPrint API key required");
    }
}
