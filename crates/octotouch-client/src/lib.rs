//! # OctoTouch Client
//!
//! `PrinterClient` implementation over the OctoPrint REST API.
//!
//! Requests are made with an async `reqwest` client driven by a private
//! single-threaded tokio runtime, so callers on the UI thread get plain
//! blocking calls.

mod octoprint;
mod responses;
mod transport;

pub use octoprint::{ClientOptions, OctoPrintClient};
pub use transport::truncate_for_log;
