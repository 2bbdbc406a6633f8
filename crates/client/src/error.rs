//! Client Error Types
//!
//! Errors for the non-analysis endpoints (PDF export, account calls) and for
//! building the HTTP client. Analysis calls do not use these: their failures
//! are tagged as `RawFailure` and end up in an `Outcome`.

use thiserror::Error;

/// Errors that can occur when talking to the service outside an analysis call.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be sent or the reply could not be read
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Non-2xx status
    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Not logged in / session expired
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Reply body did not have the expected shape
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Nothing to export for this tool
    #[error("No completed result for {tool}")]
    NoResult { tool: String },

    /// Client or endpoint misconfiguration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::NetworkError {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config {
            message: format!("Invalid URL: {}", err),
        }
    }
}

/// Map a non-2xx status and body to a `ClientError`.
pub fn parse_http_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => ClientError::AuthenticationFailed { message },
        _ => ClientError::ServerError { status, message },
    }
}
