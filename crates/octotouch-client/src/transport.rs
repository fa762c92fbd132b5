//! Request execution and transport error classification.

use std::error::Error as StdError;
use std::io;

use octotouch_core::{ClientError, ClientResult};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

const LOG_BODY_LIMIT: usize = 512;

/// Cut long response bodies before they reach the log.
pub fn truncate_for_log(text: &str) -> String {
    if text.len() <= LOG_BODY_LIMIT {
        return text.to_string();
    }
    let mut end = LOG_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes)", &text[..end], text.len())
}

/// Send the request and return the response body of a 2xx reply.
pub(crate) async fn execute(
    request: RequestBuilder,
    method: &str,
    url: &str,
) -> ClientResult<String> {
    tracing::debug!("{method} {url}");

    let response = request.send().await.map_err(|e| classify(&e, url))?;
    let status = response.status().as_u16();
    tracing::debug!("{method} {url} -> {status}");

    let body = response.text().await.map_err(|e| classify(&e, url))?;

    match status {
        200..=299 => Ok(body),
        403 => Err(ClientError::Forbidden {
            url: url.to_string(),
        }),
        _ => Err(ClientError::Http {
            status,
            url: url.to_string(),
            body: truncate_for_log(&body),
        }),
    }
}

/// Decode a JSON body, logging the raw text on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, url: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!("JSON parse failed for {url}: {e}");
        tracing::debug!("Raw response: {}", truncate_for_log(body));
        ClientError::Decode {
            reason: e.to_string(),
        }
    })
}

/// Map a reqwest failure onto the client error taxonomy.
///
/// reqwest only exposes coarse predicates, so the source chain is walked
/// for the underlying `io::Error` and for hyper's message text.
pub(crate) fn classify(err: &reqwest::Error, url: &str) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout {
            url: url.to_string(),
        };
    }
    if err.is_decode() {
        return ClientError::Decode {
            reason: err.to_string(),
        };
    }

    let chain = error_chain(err);
    let lowered = chain.to_lowercase();

    if let Some(kind) = io_error_kind(err) {
        match kind {
            io::ErrorKind::ConnectionRefused => {
                return ClientError::ConnectionRefused {
                    url: url.to_string(),
                }
            }
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => {
                return ClientError::ConnectionAborted { reason: chain };
            }
            _ => {}
        }
    }

    if lowered.contains("connection refused") {
        ClientError::ConnectionRefused {
            url: url.to_string(),
        }
    } else if lowered.contains("dns error")
        || lowered.contains("failed to lookup address")
        || lowered.contains("name or service not known")
    {
        ClientError::HostNotFound {
            host: err
                .url()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| url.to_string()),
        }
    } else if lowered.contains("connection closed before message completed")
        || lowered.contains("incomplete message")
    {
        ClientError::RemoteDisconnected { reason: chain }
    } else if lowered.contains("canceled") {
        ClientError::RequestCanceled
    } else if lowered.contains("connection reset") || lowered.contains("broken pipe") {
        ClientError::ConnectionAborted { reason: chain }
    } else {
        ClientError::other(chain)
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn io_error_kind(err: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_for_log("ok"), "ok");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "é".repeat(400);
        let out = truncate_for_log(&text);
        assert!(out.ends_with("(800 bytes)"));
        assert!(out.len() < text.len());
    }

    #[test]
    fn test_parse_json_decode_error() {
        let result: ClientResult<serde_json::Value> = parse_json("not json", "/api/job");
        assert!(matches!(result, Err(ClientError::Decode { .. })));
    }
}
