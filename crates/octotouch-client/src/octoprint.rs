//! OctoPrint REST client

use std::time::Duration;

use octotouch_core::{
    Axis, ClientError, ClientResult, FileEntry, JobInfo, PrinterClient, PrinterStatus,
    RawPrinterState, ServerVersion, SystemCommands, TemperaturePreset,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::runtime::Runtime;

use crate::responses::{ConnectionInfo, FileListing, FolderListing, Settings};
use crate::transport::{execute, parse_json};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Connection options for `OctoPrintClient`.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the server, e.g. `http://localhost:5000`
    pub base_url: String,
    /// OctoPrint API key
    pub api_key: String,
    /// Time allowed to establish the TCP connection
    pub connect_timeout: Duration,
    /// Time allowed for a whole request
    pub request_timeout: Duration,
}

impl ClientOptions {
    /// Create options with default timeouts
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Blocking `PrinterClient` over the OctoPrint REST API.
pub struct OctoPrintClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    runtime: Runtime,
}

impl OctoPrintClient {
    /// Build a client. No request is made until the first call.
    pub fn new(options: ClientOptions) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| ClientError::other(format!("Failed to build HTTP client: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::other(format!("Failed to start client runtime: {e}")))?;

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: options.api_key,
            http,
            runtime,
        })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let url = self.url(path);
        let request = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query);
        let body = self.runtime.block_on(execute(request, "GET", &url))?;
        parse_json(&body, &url)
    }

    fn post(&self, path: &str, payload: Option<Value>) -> ClientResult<()> {
        let url = self.url(path);
        let mut request = self.http.post(&url).header(API_KEY_HEADER, &self.api_key);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }
        self.runtime.block_on(execute(request, "POST", &url))?;
        Ok(())
    }
}

/// `path` segments of file URLs, without leading or doubled slashes.
fn files_path(location: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("/api/files/{location}")
    } else {
        format!("/api/files/{location}/{path}")
    }
}

impl PrinterClient for OctoPrintClient {
    fn state(&self) -> ClientResult<RawPrinterState> {
        let info: ConnectionInfo = self.get("/api/connection", &[])?;
        Ok(info.current.raw_state())
    }

    fn connect(&self) -> ClientResult<()> {
        self.post("/api/connection", Some(json!({ "command": "connect" })))
    }

    fn printer_status(&self, exclude: &[&str]) -> ClientResult<PrinterStatus> {
        let mut query = Vec::new();
        if !exclude.is_empty() {
            query.push(("exclude", exclude.join(",")));
        }
        self.get("/api/printer", &query)
    }

    fn version(&self) -> ClientResult<ServerVersion> {
        self.get("/api/version", &[])
    }

    fn job_info(&self) -> ClientResult<JobInfo> {
        self.get("/api/job", &[])
    }

    fn home(&self, axes: &[Axis]) -> ClientResult<()> {
        let axes: Vec<&str> = axes.iter().map(Axis::as_str).collect();
        self.post(
            "/api/printer/printhead",
            Some(json!({ "command": "home", "axes": axes })),
        )
    }

    fn jog(&self, x: f64, y: f64, z: f64) -> ClientResult<()> {
        self.post(
            "/api/printer/printhead",
            Some(json!({ "command": "jog", "x": x, "y": y, "z": z })),
        )
    }

    fn extrude(&self, amount: f64) -> ClientResult<()> {
        self.post(
            "/api/printer/tool",
            Some(json!({ "command": "extrude", "amount": amount })),
        )
    }

    fn select_tool(&self, tool: &str) -> ClientResult<()> {
        self.post(
            "/api/printer/tool",
            Some(json!({ "command": "select", "tool": tool })),
        )
    }

    fn set_tool_target(&self, tool: &str, target: f64) -> ClientResult<()> {
        let mut targets = Map::new();
        targets.insert(tool.to_string(), json!(target));
        self.post(
            "/api/printer/tool",
            Some(json!({ "command": "target", "targets": targets })),
        )
    }

    fn set_bed_target(&self, target: f64) -> ClientResult<()> {
        self.post(
            "/api/printer/bed",
            Some(json!({ "command": "target", "target": target })),
        )
    }

    fn gcode(&self, commands: &[String]) -> ClientResult<()> {
        self.post(
            "/api/printer/command",
            Some(json!({ "commands": commands })),
        )
    }

    fn list_files(&self, location: &str, path: &str) -> ClientResult<Vec<FileEntry>> {
        let url = files_path(location, path);
        if path.trim_matches('/').is_empty() {
            let listing: FileListing = self.get(&url, &[("recursive", "false".to_string())])?;
            Ok(listing.files)
        } else {
            let folder: FolderListing = self.get(&url, &[("recursive", "false".to_string())])?;
            Ok(folder.children)
        }
    }

    fn select_file(&self, location: &str, path: &str, print: bool) -> ClientResult<()> {
        self.post(
            &files_path(location, path),
            Some(json!({ "command": "select", "print": print })),
        )
    }

    fn cancel(&self) -> ClientResult<()> {
        self.post("/api/job", Some(json!({ "command": "cancel" })))
    }

    fn toggle_pause(&self) -> ClientResult<()> {
        self.post(
            "/api/job",
            Some(json!({ "command": "pause", "action": "toggle" })),
        )
    }

    fn temperature_presets(&self) -> ClientResult<Vec<TemperaturePreset>> {
        let settings: Settings = self.get("/api/settings", &[])?;
        Ok(settings.temperature.profiles)
    }

    fn system_commands(&self) -> ClientResult<SystemCommands> {
        self.get("/api/system/commands", &[])
    }

    fn execute_system_command(&self, source: &str, action: &str) -> ClientResult<()> {
        self.post(&format!("/api/system/commands/{source}/{action}"), None)
    }
}
