//! Printer-state model
//!
//! `RawPrinterState` mirrors the state text reported by OctoPrint,
//! `StateBucket` groups those states the way the connection monitor
//! reacts to them, and `MacroState` is the screen-level state the
//! kiosk is in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State text reported by `GET /api/connection`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawPrinterState {
    /// Connected and ready
    Operational,
    /// Printing a job
    Printing,
    /// Job paused
    Paused,
    /// Job is being cancelled
    Cancelling,
    /// Job is being paused
    Pausing,
    /// Job is resuming after a pause
    Resuming,
    /// Job is starting
    Starting,
    /// Uploading a file to the printer's SD card (OctoPrint's spelling)
    Transfering,
    /// Printer reported an error
    Error,
    /// State could not be determined
    Unknown,
    /// No connection to the printer
    Offline,
    /// Serial port closed
    Closed,
    /// Opening the serial port
    Opening,
    /// Auto-detecting the serial port or baud rate
    Detecting,
    /// Connecting to the printer
    Connecting,
    /// Anything OctoPrint reports that is not listed above
    Unrecognized(String),
}

impl RawPrinterState {
    /// Parse OctoPrint's state text. Never fails: unknown text becomes
    /// `Unrecognized`.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "Operational" => Self::Operational,
            "Printing" => Self::Printing,
            "Paused" => Self::Paused,
            "Cancelling" => Self::Cancelling,
            "Pausing" => Self::Pausing,
            "Resuming" => Self::Resuming,
            "Starting" => Self::Starting,
            "Transfering" => Self::Transfering,
            "Error" => Self::Error,
            "Unknown" => Self::Unknown,
            "Offline" => Self::Offline,
            "Closed" => Self::Closed,
            "Opening" => Self::Opening,
            "Detecting" => Self::Detecting,
            "Connecting" => Self::Connecting,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The state as OctoPrint spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Operational => "Operational",
            Self::Printing => "Printing",
            Self::Paused => "Paused",
            Self::Cancelling => "Cancelling",
            Self::Pausing => "Pausing",
            Self::Resuming => "Resuming",
            Self::Starting => "Starting",
            Self::Transfering => "Transfering",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
            Self::Offline => "Offline",
            Self::Closed => "Closed",
            Self::Opening => "Opening",
            Self::Detecting => "Detecting",
            Self::Connecting => "Connecting",
            Self::Unrecognized(text) => text,
        }
    }

    /// Group the state for the connection monitor.
    pub fn bucket(&self) -> StateBucket {
        match self {
            Self::Operational | Self::Transfering => StateBucket::Operational,
            Self::Printing
            | Self::Starting
            | Self::Pausing
            | Self::Paused
            | Self::Resuming
            | Self::Cancelling => StateBucket::Printing,
            Self::Error | Self::Unknown => StateBucket::Error,
            Self::Offline | Self::Closed => StateBucket::Offline,
            Self::Opening | Self::Detecting | Self::Connecting => StateBucket::Connecting,
            Self::Unrecognized(_) => StateBucket::Unrecognized,
        }
    }

    /// Every named state, without `Unrecognized`.
    pub fn known() -> [RawPrinterState; 15] {
        [
            Self::Operational,
            Self::Printing,
            Self::Paused,
            Self::Cancelling,
            Self::Pausing,
            Self::Resuming,
            Self::Starting,
            Self::Transfering,
            Self::Error,
            Self::Unknown,
            Self::Offline,
            Self::Closed,
            Self::Opening,
            Self::Detecting,
            Self::Connecting,
        ]
    }
}

impl fmt::Display for RawPrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RawPrinterState {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// How the connection monitor reacts to a raw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateBucket {
    /// Idle and ready for commands
    Operational,
    /// A job is active in some phase
    Printing,
    /// Printer-side error; the screen is left as it is
    Error,
    /// Not connected; ask the server to connect
    Offline,
    /// The server is connecting on its own
    Connecting,
    /// Unknown text; the screen is left as it is
    Unrecognized,
}

/// Screen-level state of the kiosk. Exactly one is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroState {
    /// Splash screen with a status message
    Splash(String),
    /// Printer ready, idle status panel shown
    Idle,
    /// Job active, print status panel shown
    Printing,
    /// Splash screen waiting for the user to tap Retry
    ErrorHold,
}

impl MacroState {
    /// True when the splash panel is the root panel.
    pub fn is_splash(&self) -> bool {
        matches!(self, MacroState::Splash(_) | MacroState::ErrorHold)
    }

    /// True when both states put the same root panel on screen.
    ///
    /// Splash messages may differ; the splash panel is still the same.
    pub fn same_screen(&self, other: &MacroState) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            MacroState::Splash(_) => "splash",
            MacroState::Idle => "idle",
            MacroState::Printing => "printing",
            MacroState::ErrorHold => "hold",
        }
    }
}

impl fmt::Display for MacroState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroState::Splash(message) => write!(f, "splash({message})"),
            other => f.write_str(other.name()),
        }
    }
}
