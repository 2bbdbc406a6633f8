//! Analysis Session Model
//!
//! One submit-to-outcome unit of work for one tool. Sessions are never reused:
//! each `submit` creates a fresh one and the previous one is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trustscope_core::{InputDescriptor, Outcome, SessionStatus, StageSpec, Tier, ToolKind};

/// Snapshot-able session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: String,
    pub tool_kind: ToolKind,
    pub tier: Tier,
    pub input: InputDescriptor,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageSpec>,
    pub current_stage_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    /// Set by cancel; the eventual reply of a superseded session is discarded.
    #[serde(default)]
    pub superseded: bool,
}

impl AnalysisSession {
    /// New session in `Idle`.
    pub fn new(tool_kind: ToolKind, tier: Tier, input: InputDescriptor, stages: Vec<StageSpec>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tool_kind,
            tier,
            input,
            status: SessionStatus::Idle,
            started_at: Utc::now(),
            finished_at: None,
            stages,
            current_stage_index: 0,
            result: None,
            superseded: false,
        }
    }

    /// Apply a status transition; illegal transitions are refused.
    pub fn transition(&mut self, next: SessionStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        if next == SessionStatus::InProgress {
            self.started_at = Utc::now();
        }
        true
    }

    /// Record the outcome and move to `Complete` or `Error`.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        let next = if outcome.is_success() {
            SessionStatus::Complete
        } else {
            SessionStatus::Error
        };
        if !self.transition(next) {
            return false;
        }
        self.current_stage_index = self.stages.len().saturating_sub(1);
        self.finished_at = Some(Utc::now());
        self.result = Some(outcome);
        true
    }

    /// In flight and not superseded: the tool slot is taken.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::InProgress && !self.superseded
    }

    pub fn elapsed_ms(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }
}
