//! Session Events
//!
//! The observer interface between the orchestrator and whatever renders it.
//! Events for one session are emitted in order; the progress terminal event
//! (`ProgressResolved`) always precedes the terminal `StatusChanged`.

use serde::{Deserialize, Serialize};

use crate::tool::ToolKind;

/// Lifecycle status of an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    InProgress,
    Complete,
    Error,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Complete | SessionStatus::Error)
    }

    /// Whether `next` is a legal transition from `self`.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Idle, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Complete)
                | (SessionStatus::InProgress, SessionStatus::Error)
        )
    }
}

/// How the progress indicator came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressResolution {
    /// All stages marked complete, readout at 100%.
    Completed,
    /// Timers stopped where they were.
    Cancelled,
}

/// Event emitted to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StatusChanged {
        session_id: String,
        tool: ToolKind,
        status: SessionStatus,
    },

    /// The simulated progress entered a new stage.
    StageAdvanced {
        session_id: String,
        tool: ToolKind,
        stage_index: usize,
        stage_id: String,
        label: String,
    },

    /// Readout update, 0.0..=100.0.
    Progress {
        session_id: String,
        tool: ToolKind,
        percent: f64,
    },

    /// The simulator reached its terminal state. No further `Progress` or
    /// `StageAdvanced` events follow for this session.
    ProgressResolved {
        session_id: String,
        tool: ToolKind,
        percent: f64,
        resolution: ProgressResolution,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::StatusChanged { session_id, .. }
            | SessionEvent::StageAdvanced { session_id, .. }
            | SessionEvent::Progress { session_id, .. }
            | SessionEvent::ProgressResolved { session_id, .. } => session_id,
        }
    }

    pub fn tool(&self) -> ToolKind {
        match self {
            SessionEvent::StatusChanged { tool, .. }
            | SessionEvent::StageAdvanced { tool, .. }
            | SessionEvent::Progress { tool, .. }
            | SessionEvent::ProgressResolved { tool, .. } => *tool,
        }
    }

    /// True for a `StatusChanged` into Complete or Error.
    pub fn is_terminal_status(&self) -> bool {
        matches!(self, SessionEvent::StatusChanged { status, .. } if status.is_terminal())
    }
}
