//! Error Classifier
//!
//! Maps a tagged `RawFailure` to a user-facing `FailureKind`.
//!
//! Transport and parse failures arrive already tagged. For failures that carry
//! server-provided text, the category is still derived from substrings of that
//! text ("size", "format", ...), which is how the service signals these cases.
//! That matching is fragile: a message that merely mentions "size" in passing
//! lands in `SizeLimitError`.

use serde::{Deserialize, Serialize};

use crate::outcome::{FailureKind, Outcome, RawFailure};

const SIZE_MARKERS: &[&str] = &["size", "too large"];
const FORMAT_MARKERS: &[&str] = &["format", "unsupported"];
const NETWORK_MARKERS: &[&str] = &["network"];

/// Classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    pub kind: FailureKind,
    pub message: String,
    pub detail: Option<String>,
}

impl Classified {
    fn new(kind: FailureKind, failure: &RawFailure) -> Self {
        Self {
            kind,
            message: kind.template().to_string(),
            detail: Some(failure.to_string()),
        }
    }

    pub fn into_outcome(self) -> Outcome {
        Outcome::Failure {
            kind: self.kind,
            message: self.message,
            detail: self.detail,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Category suggested by the message text alone, if any.
fn kind_from_message(message: &str) -> Option<FailureKind> {
    let lower = message.to_lowercase();
    if contains_any(&lower, SIZE_MARKERS) {
        Some(FailureKind::SizeLimitError)
    } else if contains_any(&lower, FORMAT_MARKERS) {
        Some(FailureKind::FormatError)
    } else if contains_any(&lower, NETWORK_MARKERS) {
        Some(FailureKind::NetworkError)
    } else {
        None
    }
}

/// Classify a raw failure.
pub fn classify(failure: &RawFailure) -> Classified {
    let kind = match failure {
        RawFailure::Unparseable { .. } => FailureKind::ValidationError,
        RawFailure::Transport { .. } => FailureKind::NetworkError,
        RawFailure::Request { message } => {
            kind_from_message(message).unwrap_or(FailureKind::UnknownError)
        }
        RawFailure::Http { message, .. } => message
            .as_deref()
            .and_then(kind_from_message)
            .unwrap_or(FailureKind::ServerError),
        RawFailure::Declared { message: Some(m) } => {
            kind_from_message(m).unwrap_or(FailureKind::AnalysisFailedError)
        }
        RawFailure::Declared { message: None } => FailureKind::UnknownError,
    };
    Classified::new(kind, failure)
}
