use std::fs;

use octotouch_settings::{
    load_config_file, read_octoprint_config, ConfigBuilder, ConfigError, Resolution,
};
use tempfile::TempDir;

const OCTOPRINT_YAML: &str = r#"
accessControl:
  enabled: true
api:
  key: 0123456789ABCDEF
server:
  host: 192.168.1.20
  port: 8080
"#;

#[test]
fn test_read_octoprint_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, OCTOPRINT_YAML).unwrap();

    let overlay = read_octoprint_config(&path).unwrap();
    assert_eq!(overlay.api_key.as_deref(), Some("0123456789ABCDEF"));
    assert_eq!(overlay.host.as_deref(), Some("192.168.1.20"));
    assert_eq!(overlay.port, Some(8080));

    let config = ConfigBuilder::new().merge(overlay).build().unwrap();
    assert_eq!(config.base_url(), "http://192.168.1.20:8080");
}

#[test]
fn test_missing_yaml_keys_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "api:\n  key: abc\n").unwrap();

    let config = ConfigBuilder::new()
        .merge(read_octoprint_config(&path).unwrap())
        .build()
        .unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5000);
}

#[test]
fn test_malformed_yaml_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "server: [unclosed\n  - {").unwrap();

    let overlay = read_octoprint_config(&path).unwrap();
    assert_eq!(overlay, Default::default());
}

#[test]
fn test_unreadable_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(read_octoprint_config(&dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_kiosk_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kiosk.toml");
    fs::write(
        &path,
        r#"
api_key = "toml-key"
url = "http://octopi.local"
resolution = "800x480"
preset = "ABS"
"#,
    )
    .unwrap();

    let config = ConfigBuilder::new()
        .merge(load_config_file(&path).unwrap())
        .build()
        .unwrap();
    assert_eq!(config.api_key, "toml-key");
    assert_eq!(config.base_url(), "http://octopi.local");
    assert_eq!(
        config.resolution,
        Resolution {
            width: 800,
            height: 480
        }
    );
    assert_eq!(config.preset, "ABS");
}

#[test]
fn test_kiosk_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kiosk.json");
    fs::write(&path, r#"{"api_key": "json-key", "port": 5001}"#).unwrap();

    let config = ConfigBuilder::new()
        .merge(load_config_file(&path).unwrap())
        .build()
        .unwrap();
    assert_eq!(config.base_url(), "http://localhost:5001");
}

#[test]
fn test_other_extensions_read_as_octoprint_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("octoprint.conf");
    fs::write(&path, OCTOPRINT_YAML).unwrap();

    let overlay = load_config_file(&path).unwrap();
    assert_eq!(overlay.port, Some(8080));
}

#[test]
fn test_bad_resolution_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kiosk.toml");
    fs::write(&path, "api_key = \"k\"\nresolution = \"big\"\n").unwrap();

    let err = ConfigBuilder::new()
        .merge(load_config_file(&path).unwrap())
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidResolution("big".to_string()));
}
