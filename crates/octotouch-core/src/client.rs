//! The `PrinterClient` capability
//!
//! Everything the kiosk asks of the printer server goes through this
//! trait. Every call may fail; callers handle the `ClientError` locally.

use std::fmt;

use crate::error::ClientResult;
use crate::models::{
    FileEntry, JobInfo, PrinterStatus, ServerVersion, SystemCommands, TemperaturePreset,
};
use crate::state::RawPrinterState;

/// Printer axis for homing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Lower-case axis name as OctoPrint expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// All three axes.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations against the printer-management server.
///
/// Methods take `&self`; implementations keep whatever connection state they
/// need behind interior mutability.
pub trait PrinterClient {
    /// Current connection state of the printer.
    fn state(&self) -> ClientResult<RawPrinterState>;

    /// Ask the server to connect to the printer with its saved defaults.
    fn connect(&self) -> ClientResult<()>;

    /// Temperatures and state flags. `exclude` names sections to leave out
    /// (`"sd"`, `"state"`, `"temperature"`).
    fn printer_status(&self, exclude: &[&str]) -> ClientResult<PrinterStatus>;

    /// Server and API version.
    fn version(&self) -> ClientResult<ServerVersion>;

    /// Current job and its progress.
    fn job_info(&self) -> ClientResult<JobInfo>;

    /// Home the given axes.
    fn home(&self, axes: &[Axis]) -> ClientResult<()>;

    /// Relative move of the print head in millimetres.
    fn jog(&self, x: f64, y: f64, z: f64) -> ClientResult<()>;

    /// Extrude (positive) or retract (negative) on the selected tool.
    fn extrude(&self, amount: f64) -> ClientResult<()>;

    /// Select the active tool (`tool0`, `tool1`, ...).
    fn select_tool(&self, tool: &str) -> ClientResult<()>;

    /// Set the target temperature of one extruder.
    fn set_tool_target(&self, tool: &str, target: f64) -> ClientResult<()>;

    /// Set the target temperature of the heated bed.
    fn set_bed_target(&self, target: f64) -> ClientResult<()>;

    /// Send raw G-code lines to the printer.
    fn gcode(&self, commands: &[String]) -> ClientResult<()>;

    /// Entries of one folder on `location` (`local` or `sdcard`). An empty
    /// `path` lists the root.
    fn list_files(&self, location: &str, path: &str) -> ClientResult<Vec<FileEntry>>;

    /// Select a file, optionally starting the print right away.
    fn select_file(&self, location: &str, path: &str, print: bool) -> ClientResult<()>;

    /// Cancel the current job.
    fn cancel(&self) -> ClientResult<()>;

    /// Pause a running job or resume a paused one.
    fn toggle_pause(&self) -> ClientResult<()>;

    /// Temperature profiles configured on the server.
    fn temperature_presets(&self) -> ClientResult<Vec<TemperaturePreset>>;

    /// Core and custom system commands.
    fn system_commands(&self) -> ClientResult<SystemCommands>;

    /// Run one system command.
    fn execute_system_command(&self, source: &str, action: &str) -> ClientResult<()>;
}
