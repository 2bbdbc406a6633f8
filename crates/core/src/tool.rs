//! Tool and Input Types
//!
//! The five analysis tools, the user's plan tier, and the transport-agnostic
//! request body each tool adapter builds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Tool kind & tier
// ============================================================================

/// One analysis surface. At most one session per tool may be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Image,
    News,
    Speech,
    YoutubeSpeech,
    Unified,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Image,
        ToolKind::News,
        ToolKind::Speech,
        ToolKind::YoutubeSpeech,
        ToolKind::Unified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Image => "image",
            ToolKind::News => "news",
            ToolKind::Speech => "speech",
            ToolKind::YoutubeSpeech => "youtube-speech",
            ToolKind::Unified => "unified",
        }
    }

    /// Human-facing label, used in share text and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Image => "Image Analysis",
            ToolKind::News => "News Analysis",
            ToolKind::Speech => "Speech Analysis",
            ToolKind::YoutubeSpeech => "YouTube Speech Analysis",
            ToolKind::Unified => "Unified Analysis",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "image" => Ok(ToolKind::Image),
            "news" => Ok(ToolKind::News),
            "speech" => Ok(ToolKind::Speech),
            "youtube-speech" | "youtube" => Ok(ToolKind::YoutubeSpeech),
            "unified" => Ok(ToolKind::Unified),
            other => Err(CoreError::validation(format!("Unknown tool: {}", other))),
        }
    }
}

/// User plan level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    pub fn is_pro(&self) -> bool {
        matches!(self, Tier::Pro)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
        }
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            other => Err(CoreError::validation(format!("Unknown tier: {}", other))),
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// An uploaded file, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub file_name: String,
    /// `None` lets the transport guess from the file name.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

/// Content submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    Text(String),
    Url(String),
    File(FileInput),
}

impl AnalysisInput {
    /// Summary kept on the session; raw content is not retained.
    pub fn describe(&self) -> InputDescriptor {
        match self {
            AnalysisInput::Text(text) => InputDescriptor::Text {
                chars: text.chars().count(),
            },
            AnalysisInput::Url(url) => InputDescriptor::Url { url: url.clone() },
            AnalysisInput::File(file) => InputDescriptor::File {
                file_name: file.file_name.clone(),
                size_bytes: file.bytes.len() as u64,
            },
        }
    }

    /// The `type` discriminator the JSON endpoints expect.
    pub fn content_type(&self) -> &'static str {
        match self {
            AnalysisInput::Text(_) => "text",
            AnalysisInput::Url(_) => "url",
            AnalysisInput::File(_) => "file",
        }
    }
}

/// Loggable description of a submission's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputDescriptor {
    Text { chars: usize },
    Url { url: String },
    File { file_name: String, size_bytes: u64 },
}

impl fmt::Display for InputDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputDescriptor::Text { chars } => write!(f, "text ({} chars)", chars),
            InputDescriptor::Url { url } => write!(f, "url {}", url),
            InputDescriptor::File {
                file_name,
                size_bytes,
            } => write!(f, "file {} ({} bytes)", file_name, size_bytes),
        }
    }
}

// ============================================================================
// Request body
// ============================================================================

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    File { name: String, file: FileInput },
}

/// Request body produced by a tool adapter, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// Sent without an explicit content-type header; the transport sets the
    /// boundary itself.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }

    /// Look up a text field by name (JSON key or multipart text part).
    pub fn text_field(&self, name: &str) -> Option<String> {
        match self {
            RequestBody::Json(value) => value.get(name).map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            RequestBody::Multipart(parts) => parts.iter().find_map(|p| match p {
                MultipartPart::Text { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            }),
        }
    }
}
