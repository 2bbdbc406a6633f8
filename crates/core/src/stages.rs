//! Progress Stage Definitions
//!
//! Pre-authored stage sequences for the cosmetic progress indicator. Durations
//! are planned values only and bear no relation to real backend latency.

use serde::{Deserialize, Serialize};

use crate::tool::ToolKind;

/// One labeled step of the progress sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSpec {
    pub id: String,
    pub label: String,
    pub planned_duration_ms: u64,
}

impl StageSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, planned_duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            planned_duration_ms,
        }
    }
}

/// Sum of planned durations.
pub fn total_planned_ms(stages: &[StageSpec]) -> u64 {
    stages.iter().map(|s| s.planned_duration_ms).sum()
}

/// The fixed stage sequence for a tool.
pub fn default_stages(tool: ToolKind) -> Vec<StageSpec> {
    let table: &[(&str, &str, u64)] = match tool {
        ToolKind::Image => &[
            ("upload", "Uploading image", 1_200),
            ("metadata", "Reading metadata", 1_500),
            ("forensics", "Running forensic checks", 3_000),
            ("generation", "Detecting AI generation artifacts", 3_000),
            ("report", "Compiling report", 1_500),
        ],
        ToolKind::News => &[
            ("fetch", "Retrieving content", 1_500),
            ("sources", "Checking sources", 2_500),
            ("claims", "Verifying claims", 3_500),
            ("bias", "Assessing bias and tone", 2_500),
            ("score", "Calculating trust score", 1_500),
        ],
        ToolKind::Speech => &[
            ("upload", "Uploading audio", 2_000),
            ("transcribe", "Transcribing speech", 5_000),
            ("claims", "Extracting claims", 3_000),
            ("verify", "Fact-checking statements", 4_000),
            ("report", "Compiling report", 1_500),
        ],
        ToolKind::YoutubeSpeech => &[
            ("download", "Fetching video audio", 3_000),
            ("transcribe", "Transcribing speech", 5_000),
            ("claims", "Extracting claims", 3_000),
            ("verify", "Fact-checking statements", 4_000),
            ("report", "Compiling report", 1_500),
        ],
        ToolKind::Unified => &[
            ("prepare", "Preparing content", 1_500),
            ("analyze", "Running analysis", 4_000),
            ("crosscheck", "Cross-checking findings", 3_000),
            ("score", "Calculating trust score", 1_500),
        ],
    };

    table
        .iter()
        .map(|(id, label, ms)| StageSpec::new(*id, *label, *ms))
        .collect()
}
