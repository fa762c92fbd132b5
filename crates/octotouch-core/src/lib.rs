//! # OctoTouch Core
//!
//! Core types and traits shared by every OctoTouch crate:
//! the client error taxonomy, the printer-state model used by the
//! connection monitor, the `PrinterClient` capability and the data
//! models returned by an OctoPrint server.

pub mod client;
pub mod error;
pub mod models;
pub mod state;
pub mod text;

pub use client::{Axis, PrinterClient};
pub use error::{ClientError, ClientResult, Error, Result};
pub use models::{
    FileEntry, FileKind, JobDetails, JobFile, JobInfo, JobProgress, PrinterFlags,
    PrinterStateBlock, PrinterStatus, ServerVersion, StateReport, SystemCommand, SystemCommands,
    TemperatureData, TemperaturePreset,
};
pub use state::{MacroState, RawPrinterState, StateBucket};
pub use text::{ellipsis, ellipsis_len, filename_ellipsis};

/// Initial splash text shown before the first successful poll.
pub const INITIALIZING_MESSAGE: &str = "Initializing...";

/// Splash text shown while the printer is asked to connect.
pub const STARTUP_MESSAGE: &str = "Startup...";
