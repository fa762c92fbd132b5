//! Test doubles shared by the UI integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use octotouch_core::{
    Axis, ClientError, ClientResult, FileEntry, JobInfo, PrinterClient, PrinterStatus,
    RawPrinterState, ServerVersion, SystemCommands, TemperaturePreset,
};
use octotouch_settings::{Config, Resolution};
use octotouch_ui::{BuildInfo, Clock, DisplaySurface, PanelView, Supervisor, UiContext};

/// Scripted `PrinterClient` that records every command it receives.
pub struct MockPrinter {
    script: RefCell<VecDeque<ClientResult<RawPrinterState>>>,
    fallback: RefCell<ClientResult<RawPrinterState>>,
    pub state_calls: Cell<u32>,
    pub connect_calls: Cell<u32>,
    pub calls: RefCell<Vec<String>>,
    pub status: RefCell<PrinterStatus>,
    pub job: RefCell<JobInfo>,
    pub files: RefCell<Vec<FileEntry>>,
    pub presets: RefCell<Vec<TemperaturePreset>>,
}

impl MockPrinter {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            script: RefCell::new(VecDeque::new()),
            fallback: RefCell::new(Ok(RawPrinterState::Operational)),
            state_calls: Cell::new(0),
            connect_calls: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            status: RefCell::new(PrinterStatus::default()),
            job: RefCell::new(JobInfo::default()),
            files: RefCell::new(Vec::new()),
            presets: RefCell::new(Vec::new()),
        })
    }

    /// Queue results for the next `state()` calls.
    pub fn script<I>(&self, results: I)
    where
        I: IntoIterator<Item = ClientResult<RawPrinterState>>,
    {
        self.script.borrow_mut().extend(results);
    }

    /// Queue plain states for the next `state()` calls.
    pub fn script_states(&self, states: &[RawPrinterState]) {
        self.script(states.iter().cloned().map(Ok));
    }

    /// Result once the script is exhausted.
    pub fn set_fallback(&self, result: ClientResult<RawPrinterState>) {
        *self.fallback.borrow_mut() = result;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> ClientResult<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl PrinterClient for MockPrinter {
    fn state(&self) -> ClientResult<RawPrinterState> {
        self.state_calls.set(self.state_calls.get() + 1);
        match self.script.borrow_mut().pop_front() {
            Some(result) => result,
            None => self.fallback.borrow().clone(),
        }
    }

    fn connect(&self) -> ClientResult<()> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        self.record("connect".to_string())
    }

    fn printer_status(&self, _exclude: &[&str]) -> ClientResult<PrinterStatus> {
        Ok(self.status.borrow().clone())
    }

    fn version(&self) -> ClientResult<ServerVersion> {
        Ok(ServerVersion {
            api: "0.1".into(),
            server: "1.9.3".into(),
            text: "OctoPrint 1.9.3".into(),
        })
    }

    fn job_info(&self) -> ClientResult<JobInfo> {
        Ok(self.job.borrow().clone())
    }

    fn home(&self, axes: &[Axis]) -> ClientResult<()> {
        let axes: Vec<&str> = axes.iter().map(Axis::as_str).collect();
        self.record(format!("home {}", axes.join(" ")))
    }

    fn jog(&self, x: f64, y: f64, z: f64) -> ClientResult<()> {
        self.record(format!("jog {x} {y} {z}"))
    }

    fn extrude(&self, amount: f64) -> ClientResult<()> {
        self.record(format!("extrude {amount}"))
    }

    fn select_tool(&self, tool: &str) -> ClientResult<()> {
        self.record(format!("tool {tool}"))
    }

    fn set_tool_target(&self, tool: &str, target: f64) -> ClientResult<()> {
        self.record(format!("target {tool} {target}"))
    }

    fn set_bed_target(&self, target: f64) -> ClientResult<()> {
        self.record(format!("target bed {target}"))
    }

    fn gcode(&self, commands: &[String]) -> ClientResult<()> {
        self.record(format!("gcode {}", commands.join(";")))
    }

    fn list_files(&self, location: &str, path: &str) -> ClientResult<Vec<FileEntry>> {
        self.calls
            .borrow_mut()
            .push(format!("list {location} {path}"));
        Ok(self.files.borrow().clone())
    }

    fn select_file(&self, location: &str, path: &str, print: bool) -> ClientResult<()> {
        self.record(format!("select {location} {path} {print}"))
    }

    fn cancel(&self) -> ClientResult<()> {
        self.record("cancel".to_string())
    }

    fn toggle_pause(&self) -> ClientResult<()> {
        self.record("pause".to_string())
    }

    fn temperature_presets(&self) -> ClientResult<Vec<TemperaturePreset>> {
        Ok(self.presets.borrow().clone())
    }

    fn system_commands(&self) -> ClientResult<SystemCommands> {
        Ok(SystemCommands::default())
    }

    fn execute_system_command(&self, source: &str, action: &str) -> ClientResult<()> {
        self.record(format!("system {source} {action}"))
    }
}

pub fn refused() -> ClientError {
    ClientError::ConnectionRefused {
        url: "http://localhost:5000/api/connection".into(),
    }
}

/// Counts supervisor signals.
#[derive(Default)]
pub struct RecordingSupervisor {
    pub ready: Cell<u32>,
    pub watchdog: Cell<u32>,
}

impl Supervisor for RecordingSupervisor {
    fn ready(&self) {
        self.ready.set(self.ready.get() + 1);
    }

    fn watchdog(&self) {
        self.watchdog.set(self.watchdog.get() + 1);
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Surface that remembers which panels were mounted.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub attached: Rc<RefCell<Vec<String>>>,
    pub last: Rc<RefCell<Option<PanelView>>>,
}

impl RecordingSurface {
    pub fn attached(&self) -> Vec<String> {
        self.attached.borrow().clone()
    }
}

impl DisplaySurface for RecordingSurface {
    fn attach(&mut self, panel: &str, view: &PanelView) {
        self.attached.borrow_mut().push(panel.to_string());
        *self.last.borrow_mut() = Some(view.clone());
    }

    fn update(&mut self, view: &PanelView) {
        *self.last.borrow_mut() = Some(view.clone());
    }
}

pub fn test_config() -> Config {
    Config {
        api_key: "test-key".into(),
        host: "localhost".into(),
        port: 5000,
        url: None,
        resolution: Resolution {
            width: 480,
            height: 320,
        },
        preset: "PLA".into(),
    }
}

pub fn context(printer: &Rc<MockPrinter>) -> Rc<UiContext> {
    let printer: Rc<dyn PrinterClient> = printer.clone();
    UiContext::new(Arc::new(test_config()), printer, BuildInfo::default())
}
