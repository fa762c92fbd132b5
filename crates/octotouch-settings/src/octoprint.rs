//! Discovery and reading of the local OctoPrint `config.yaml`.
//!
//! Only `server.host`, `server.port` and `api.key` are read. Missing keys
//! keep their lower-layer values and a malformed file is reported and
//! ignored.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::config::ConfigOverlay;
use crate::error::{SettingsError, SettingsResult};

const PI_HOME: &str = "/home/pi";
const CONFIG_FILE: &str = ".octoprint/config.yaml";

/// First existing `config.yaml` under the Raspberry Pi user's home, then
/// the current user's home.
pub fn find_octoprint_config() -> Option<PathBuf> {
    let mut bases = vec![PathBuf::from(PI_HOME)];
    if let Some(home) = dirs::home_dir() {
        bases.push(home);
    }
    find_in(&bases)
}

/// First base directory holding `.octoprint/config.yaml`.
pub(crate) fn find_in(bases: &[PathBuf]) -> Option<PathBuf> {
    bases
        .iter()
        .map(|base| base.join(CONFIG_FILE))
        .find(|path| path.is_file())
}

/// Read the interesting keys of an OctoPrint `config.yaml`.
///
/// An unreadable file is an error; a file that is not valid YAML is logged
/// and yields an empty overlay.
pub fn read_octoprint_config(path: &Path) -> SettingsResult<ConfigOverlay> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SettingsError::LoadError(format!("Cannot read config file: {e}")))?;

    let yaml: Value = match serde_yaml::from_str(&content) {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::warn!("Error parsing {}: {e}", path.display());
            return Ok(ConfigOverlay::default());
        }
    };

    let server = yaml.get("server");
    let host = server
        .and_then(|s| s.get("host"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let port = server.and_then(|s| s.get("port")).and_then(|p| match p {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    let api_key = yaml
        .get("api")
        .and_then(|a| a.get("key"))
        .and_then(Value::as_str)
        .map(str::to_string);

    tracing::debug!(
        "Read OctoPrint config {}: host={host:?} port={port:?} key_present={}",
        path.display(),
        api_key.is_some()
    );

    Ok(ConfigOverlay {
        api_key,
        host,
        port,
        ..Default::default()
    })
}
