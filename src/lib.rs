//! # OctoTouch
//!
//! Touchscreen kiosk client for OctoPrint 3D-printer servers.
//!
//! ## Architecture
//!
//! OctoTouch is organized as a workspace with multiple crates:
//!
//! 1. **octotouch-core** - Printer-state model, `PrinterClient` trait, errors, data models
//! 2. **octotouch-client** - `PrinterClient` over the OctoPrint REST API
//! 3. **octotouch-settings** - Configuration loading and validation
//! 4. **octotouch-ui** - Dispatcher, periodic tasks, connection monitor, panels, surfaces
//! 5. **octotouch** - Main binary that wires the crates together

pub mod cli;

use std::path::PathBuf;

pub use octotouch_client::{ClientOptions, OctoPrintClient};
pub use octotouch_core::{ClientError, MacroState, PrinterClient, RawPrinterState};
pub use octotouch_settings::{Config, ConfigBuilder, ConfigError, Resolution};
pub use octotouch_ui::{
    BuildInfo, HeadlessSurface, NullSupervisor, Shell, Supervisor, SystemdNotifier, UiContext,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        build_date: BUILD_DATE,
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Level directive used when `RUST_LOG` is not set
    pub level: String,
    /// Log file, truncated on start; stdout when `None`
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - `RUST_LOG` support, falling back to the configured level
/// - Thread names, so timer threads show up by task name
/// - Output to stdout or to a log file
pub fn init_logging(options: &LogOptions) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&options.level))?;

    match &options.file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let fmt_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        None => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
