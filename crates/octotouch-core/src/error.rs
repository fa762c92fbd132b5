//! Error handling for OctoTouch
//!
//! Two layers:
//! - `ClientError` for every failure of a `PrinterClient` call
//! - `Error`, the umbrella type used by the rest of the application
//!
//! `ClientError` values are cheap to clone so test doubles can replay them.

use thiserror::Error;

/// Failure of a call against the printer server.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Nothing is listening at the server address
    #[error("Connection refused by {url}")]
    ConnectionRefused {
        /// The URL that refused the connection.
        url: String,
    },

    /// The server host name could not be resolved
    #[error("Name or service not known: {host}")]
    HostNotFound {
        /// The host name that failed to resolve.
        host: String,
    },

    /// The server rejected the API key
    #[error("Forbidden: {url}")]
    Forbidden {
        /// The URL that returned 403.
        url: String,
    },

    /// The server closed the connection without sending a response
    #[error("Remote end closed connection without response: {reason}")]
    RemoteDisconnected {
        /// Transport detail.
        reason: String,
    },

    /// The request was canceled before it completed
    #[error("Request canceled")]
    RequestCanceled,

    /// The connection was reset or broken mid-request
    #[error("Connection aborted: {reason}")]
    ConnectionAborted {
        /// Transport detail.
        reason: String,
    },

    /// The request did not complete in time
    #[error("Request to {url} timed out")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The request URL.
        url: String,
        /// The response body, possibly truncated.
        body: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// The reason decoding failed.
        reason: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl ClientError {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        ClientError::Other {
            message: msg.into(),
        }
    }

    /// Convert the error into the message shown on the splash screen.
    pub fn humanize(&self) -> String {
        match self {
            ClientError::ConnectionRefused { .. } => {
                "Unable to connect to OctoPrint - is it running?".to_string()
            }
            ClientError::HostNotFound { .. } => {
                "OctoPrint server not found - check address".to_string()
            }
            ClientError::Forbidden { .. } | ClientError::Http { status: 403, .. } => {
                "OctoPrint login refused - check API key".to_string()
            }
            ClientError::RequestCanceled
            | ClientError::ConnectionAborted { .. }
            | ClientError::Http { status: 404, .. } => "Starting...".to_string(),
            other => format!("Unexpected error: {other}"),
        }
    }

    /// True for the connection churn OctoPrint produces while idle.
    ///
    /// The monitor retries these on the next tick without logging an error
    /// or touching the splash text.
    pub fn is_remote_disconnect(&self) -> bool {
        matches!(self, ClientError::RemoteDisconnected { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode {
            reason: err.to_string(),
        }
    }
}

/// Result of a `PrinterClient` call
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Main error type for OctoTouch
#[derive(Error, Debug)]
pub enum Error {
    /// Printer server call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a printer server error
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Client(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
