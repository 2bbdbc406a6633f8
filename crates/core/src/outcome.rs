//! Outcome Types
//!
//! The canonical result of one analysis call, plus the raw reply and raw
//! failure shapes that the normalizer and classifier consume.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result payload as returned by the service. Its shape differs per tool and
/// is passed through untouched.
pub type Payload = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Failure kinds
// ============================================================================

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    NetworkError,
    ServerError,
    ValidationError,
    SizeLimitError,
    FormatError,
    AnalysisFailedError,
    UnknownError,
}

impl FailureKind {
    /// The one fixed message shown to the user for this kind.
    pub fn template(&self) -> &'static str {
        match self {
            FailureKind::NetworkError => {
                "Network error. Please check your connection and try again."
            }
            FailureKind::ServerError => {
                "The analysis service is temporarily unavailable. Please try again later."
            }
            FailureKind::ValidationError => "Server returned invalid response",
            FailureKind::SizeLimitError => {
                "File is too large. Please upload a smaller file and try again."
            }
            FailureKind::FormatError => {
                "Unsupported file format. Please upload a supported file type."
            }
            FailureKind::AnalysisFailedError => {
                "The analysis could not be completed for this content. Please try different content."
            }
            FailureKind::UnknownError => "Something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NetworkError => "NetworkError",
            FailureKind::ServerError => "ServerError",
            FailureKind::ValidationError => "ValidationError",
            FailureKind::SizeLimitError => "SizeLimitError",
            FailureKind::FormatError => "FormatError",
            FailureKind::AnalysisFailedError => "AnalysisFailedError",
            FailureKind::UnknownError => "UnknownError",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Normalized result of an analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        payload: Payload,
    },
    Failure {
        kind: FailureKind,
        /// Fixed template for `kind`.
        message: String,
        /// Raw server or transport text, for logs.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl Outcome {
    pub fn success(payload: Payload) -> Self {
        Outcome::Success { payload }
    }

    /// Failure with the kind's fixed template as message.
    pub fn failure(kind: FailureKind, detail: Option<String>) -> Self {
        Outcome::Failure {
            kind,
            message: kind.template().to_string(),
            detail,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Outcome::Success { payload } => Some(payload),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

// ============================================================================
// Raw reply & raw failure
// ============================================================================

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failure tagged with its cause at the boundary where it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// The request could not be sent or the reply could not be read.
    Transport { message: String },
    /// The request could not be built (unreadable file, input the tool rejects).
    Request { message: String },
    /// The body did not parse as a JSON object.
    Unparseable { body: String },
    /// HTTP status outside 2xx; `message` is the body's `error` field, if any.
    Http { status: u16, message: Option<String> },
    /// 2xx reply that failed the acceptance rule.
    Declared { message: Option<String> },
}

impl RawFailure {
    /// Server- or transport-provided text, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            RawFailure::Transport { message } | RawFailure::Request { message } => {
                Some(message.as_str())
            }
            RawFailure::Unparseable { .. } => None,
            RawFailure::Http { message, .. } | RawFailure::Declared { message } => {
                message.as_deref()
            }
        }
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawFailure::Transport { message } => write!(f, "transport: {}", message),
            RawFailure::Request { message } => write!(f, "request: {}", message),
            RawFailure::Unparseable { body } => {
                let preview: String = body.chars().take(120).collect();
                write!(f, "unparseable body: {}", preview)
            }
            RawFailure::Http { status, message } => match message {
                Some(m) => write!(f, "HTTP {}: {}", status, m),
                None => write!(f, "HTTP {}", status),
            },
            RawFailure::Declared { message } => match message {
                Some(m) => write!(f, "declared error: {}", m),
                None => f.write_str("reply did not contain a result"),
            },
        }
    }
}
