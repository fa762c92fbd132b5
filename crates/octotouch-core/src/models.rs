//! Data models returned by the OctoPrint REST API
//!
//! Only the fields the panels display are modelled; unknown fields are
//! ignored by serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::RawPrinterState;

/// `GET /api/connection` → `current`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    /// State text, parsed leniently
    pub state: String,
    /// Serial port in use
    #[serde(default)]
    pub port: Option<String>,
    /// Baud rate in use
    #[serde(default)]
    pub baudrate: Option<u32>,
}

impl StateReport {
    /// Parsed state.
    pub fn raw_state(&self) -> RawPrinterState {
        RawPrinterState::parse(&self.state)
    }
}

/// Temperature of one heater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureData {
    /// Current temperature in °C
    #[serde(default)]
    pub actual: Option<f64>,
    /// Target temperature in °C
    #[serde(default)]
    pub target: Option<f64>,
    /// Offset applied by OctoPrint
    #[serde(default)]
    pub offset: Option<f64>,
}

impl TemperatureData {
    /// True while the heater has a non-zero target.
    pub fn is_heating(&self) -> bool {
        self.target.is_some_and(|t| t > 0.0)
    }

    /// `"actual°C ⇒ target°C"` as shown on the status panels.
    pub fn label(&self) -> String {
        format!(
            "{:.0}°C ⇒ {:.0}°C",
            self.actual.unwrap_or(0.0),
            self.target.unwrap_or(0.0)
        )
    }
}

/// `state.flags` of `GET /api/printer`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterFlags {
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub printing: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub pausing: bool,
    #[serde(default)]
    pub cancelling: bool,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub closed_or_error: bool,
}

/// `state` of `GET /api/printer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterStateBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub flags: PrinterFlags,
}

/// `GET /api/printer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Heaters keyed by OctoPrint name (`tool0`, `tool1`, `bed`, ...)
    #[serde(default)]
    pub temperature: BTreeMap<String, TemperatureData>,
    #[serde(default)]
    pub state: PrinterStateBlock,
}

impl PrinterStatus {
    /// Names of the extruders, in order.
    pub fn tools(&self) -> Vec<String> {
        self.temperature
            .keys()
            .filter(|name| name.starts_with("tool"))
            .cloned()
            .collect()
    }

    /// Reading of the named heater.
    pub fn heater(&self, name: &str) -> Option<&TemperatureData> {
        self.temperature.get(name)
    }

    /// Reading of the heated bed.
    pub fn bed(&self) -> Option<&TemperatureData> {
        self.heater("bed")
    }
}

/// `job.file` of `GET /api/job`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// `job` of `GET /api/job`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default)]
    pub file: JobFile,
    /// Duration of the last print of this file in seconds
    #[serde(default)]
    pub last_print_time: Option<f64>,
}

/// `progress` of `GET /api/job`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    /// Percentage done, 0..=100
    #[serde(default)]
    pub completion: Option<f64>,
    /// Seconds printed so far
    #[serde(default)]
    pub print_time: Option<u64>,
    /// Estimated seconds left
    #[serde(default)]
    pub print_time_left: Option<u64>,
}

/// `GET /api/job`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub job: JobDetails,
    #[serde(default)]
    pub progress: JobProgress,
    #[serde(default)]
    pub state: String,
}

impl JobInfo {
    /// File name of the job, if a file is selected.
    pub fn file_name(&self) -> Option<&str> {
        self.job
            .file
            .display
            .as_deref()
            .or(self.job.file.name.as_deref())
    }
}

/// Kind of entry in a file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    Machinecode,
    Model,
    #[serde(other)]
    Other,
}

/// One entry of `GET /api/files/{location}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Upload time, seconds since the epoch
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    /// Folders first, then files newest first.
    pub fn sort_for_display(entries: &mut [FileEntry]) {
        entries.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| b.date.unwrap_or(0).cmp(&a.date.unwrap_or(0)))
                .then_with(|| a.name.cmp(&b.name))
        });
    }
}

/// Temperature profile from `GET /api/settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePreset {
    pub name: String,
    #[serde(default)]
    pub extruder: f64,
    #[serde(default)]
    pub bed: f64,
}

/// `GET /api/version`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub text: String,
}

/// One entry of `GET /api/system/commands`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCommand {
    pub action: String,
    pub name: String,
    #[serde(default)]
    pub source: String,
    /// Prompt to show before running, when the server asks for one
    #[serde(default)]
    pub confirm: Option<String>,
}

/// `GET /api/system/commands`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemCommands {
    #[serde(default)]
    pub core: Vec<SystemCommand>,
    #[serde(default)]
    pub custom: Vec<SystemCommand>,
}
