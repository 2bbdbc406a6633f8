//! Progress Simulator
//!
//! The service gives no progress callbacks, so perceived progress is simulated:
//! a fixed stage sequence advances on its own timers and the readout eases
//! between stage boundaries. The readout holds at `HOLD_PERCENT` once the
//! planned time runs out; only `force_complete` reaches 100%.
//!
//! Split in two:
//! - `ProgressTimeline` - pure function from elapsed time to (stage, percent)
//! - `ProgressSimulator` - drives the timeline on `tokio::time` and emits events
//!
//! Because the driver uses `tokio::time`, tests run it on a paused clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use trustscope_core::stages::total_planned_ms;
use trustscope_core::{ProgressResolution, SessionEvent, StageSpec, ToolKind};

/// Ceiling for the simulated readout before the real reply arrives.
pub const HOLD_PERCENT: f64 = 95.0;

/// Ease-out cubic on `t` in 0..=1.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ============================================================================
// Timeline
// ============================================================================

/// Position on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelinePoint {
    pub stage_index: usize,
    pub percent: f64,
}

/// Stage boundaries laid out over planned time.
///
/// Stage *i* occupies `[offset_i, offset_i + duration_i)`; its share of the
/// readout is proportional to its share of the total planned time.
#[derive(Debug, Clone, Default)]
pub struct ProgressTimeline {
    stages: Vec<StageSpec>,
    offsets: Vec<u64>,
    total_ms: u64,
}

impl ProgressTimeline {
    pub fn new(stages: Vec<StageSpec>) -> Self {
        let total_ms = total_planned_ms(&stages);
        let offsets = stages
            .iter()
            .scan(0u64, |start, stage| {
                let offset = *start;
                *start += stage.planned_duration_ms;
                Some(offset)
            })
            .collect();
        Self {
            stages,
            offsets,
            total_ms,
        }
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    fn boundary(&self, offset_ms: u64) -> f64 {
        if self.total_ms == 0 {
            return HOLD_PERCENT;
        }
        HOLD_PERCENT * offset_ms as f64 / self.total_ms as f64
    }

    /// Stage and readout after `elapsed_ms`.
    pub fn at(&self, elapsed_ms: u64) -> TimelinePoint {
        let last = self.stages.len().saturating_sub(1);

        for (i, stage) in self.stages.iter().enumerate() {
            let start = self.offsets[i];
            let end = start + stage.planned_duration_ms;
            if elapsed_ms < end {
                let t = (elapsed_ms - start) as f64 / stage.planned_duration_ms as f64;
                let lo = self.boundary(start);
                let hi = self.boundary(end);
                return TimelinePoint {
                    stage_index: i,
                    percent: lo + ease_out_cubic(t) * (hi - lo),
                };
            }
        }

        TimelinePoint {
            stage_index: last,
            percent: HOLD_PERCENT,
        }
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Simulator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl SimulatorPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimulatorPhase::Completed | SimulatorPhase::Cancelled)
    }
}

/// Point-in-time view of the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub phase: SimulatorPhase,
    pub stage_index: usize,
    pub completed_stages: usize,
    pub stage_count: usize,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_label: Option<String>,
}

struct SimState {
    phase: SimulatorPhase,
    timeline: ProgressTimeline,
    stage_index: usize,
    completed_stages: usize,
    percent: f64,
}

fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Event sink bound to one session.
#[derive(Clone)]
struct Emitter {
    session_id: String,
    tool: ToolKind,
    events: broadcast::Sender<SessionEvent>,
}

impl Emitter {
    fn send(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn progress(&self, percent: f64) {
        self.send(SessionEvent::Progress {
            session_id: self.session_id.clone(),
            tool: self.tool,
            percent,
        });
    }

    fn stage(&self, stage_index: usize, stage: &StageSpec) {
        self.send(SessionEvent::StageAdvanced {
            session_id: self.session_id.clone(),
            tool: self.tool,
            stage_index,
            stage_id: stage.id.clone(),
            label: stage.label.clone(),
        });
    }

    fn resolved(&self, percent: f64, resolution: ProgressResolution) {
        self.send(SessionEvent::ProgressResolved {
            session_id: self.session_id.clone(),
            tool: self.tool,
            percent,
            resolution,
        });
    }
}

/// Cancelable staged timer sequence for one session.
///
/// All state changes and their events happen under one lock, so once
/// `force_complete` or `cancel` has returned no timer tick can emit again.
pub struct ProgressSimulator {
    state: Arc<Mutex<SimState>>,
    emitter: Emitter,
    stop: CancellationToken,
    tick: Duration,
}

impl ProgressSimulator {
    pub fn new(
        session_id: impl Into<String>,
        tool: ToolKind,
        events: broadcast::Sender<SessionEvent>,
        tick: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                phase: SimulatorPhase::Idle,
                timeline: ProgressTimeline::default(),
                stage_index: 0,
                completed_stages: 0,
                percent: 0.0,
            })),
            emitter: Emitter {
                session_id: session_id.into(),
                tool,
                events,
            },
            stop: CancellationToken::new(),
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    /// Begin the sequence. Only the first call on an idle simulator has an
    /// effect. Must be called inside a tokio runtime.
    pub fn start(&self, stages: Vec<StageSpec>) -> bool {
        {
            let mut state = lock(&self.state);
            if state.phase != SimulatorPhase::Idle {
                return false;
            }
            state.timeline = ProgressTimeline::new(stages);
            state.phase = SimulatorPhase::Running;
            state.stage_index = 0;
            state.completed_stages = 0;
            state.percent = 0.0;

            if let Some(first) = state.timeline.stages().first() {
                self.emitter.stage(0, first);
            }
            self.emitter.progress(0.0);
        }

        tokio::spawn(drive(
            self.state.clone(),
            self.emitter.clone(),
            self.stop.clone(),
            self.tick,
        ));
        true
    }

    /// Mark every stage complete and set the readout to 100%.
    pub fn force_complete(&self) -> bool {
        let mut state = lock(&self.state);
        if state.phase.is_terminal() {
            return false;
        }
        let count = state.timeline.stages().len();
        state.phase = SimulatorPhase::Completed;
        state.stage_index = count.saturating_sub(1);
        state.completed_stages = count;
        state.percent = 100.0;
        self.stop.cancel();
        self.emitter.resolved(100.0, ProgressResolution::Completed);
        true
    }

    /// Stop pending timers, leaving the last rendered stage and readout as is.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state);
        if state.phase.is_terminal() {
            return false;
        }
        state.phase = SimulatorPhase::Cancelled;
        self.stop.cancel();
        self.emitter.resolved(state.percent, ProgressResolution::Cancelled);
        true
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = lock(&self.state);
        let stages = state.timeline.stages();
        ProgressSnapshot {
            phase: state.phase,
            stage_index: state.stage_index,
            completed_stages: state.completed_stages,
            stage_count: stages.len(),
            percent: state.percent,
            stage_label: stages.get(state.stage_index).map(|s| s.label.clone()),
        }
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

async fn drive(
    state: Arc<Mutex<SimState>>,
    emitter: Emitter,
    cancel: CancellationToken,
    tick: Duration,
) {
    let started = Instant::now();
    let mut interval = tokio::time::interval_at(started + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let mut s = lock(&state);
        if s.phase != SimulatorPhase::Running {
            break;
        }

        let point = s.timeline.at(elapsed_ms);
        while s.stage_index < point.stage_index {
            s.stage_index += 1;
            s.completed_stages = s.stage_index;
            let index = s.stage_index;
            if let Some(stage) = s.timeline.stages().get(index) {
                emitter.stage(index, stage);
            }
        }
        if point.percent > s.percent {
            s.percent = point.percent;
            emitter.progress(point.percent);
        }

        if elapsed_ms >= s.timeline.total_ms() {
            // Holding; nothing changes until force_complete or cancel.
            break;
        }
    }
}
