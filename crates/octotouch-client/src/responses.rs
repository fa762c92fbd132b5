//! Wire envelopes that only exist to reach the interesting part of a
//! response.

use octotouch_core::{FileEntry, StateReport, TemperaturePreset};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionInfo {
    pub current: StateReport,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileListing {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FolderListing {
    #[serde(default)]
    pub children: Vec<FileEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TemperatureSettings {
    #[serde(default)]
    pub profiles: Vec<TemperaturePreset>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub temperature: TemperatureSettings,
}
