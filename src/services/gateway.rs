//! Request Gateway
//!
//! Owns the single-flight invariant: at most one in-flight session per tool.
//! A submit builds the request through the tool's adapter, starts the progress
//! simulator, issues exactly one backend call, and resolves the reply into an
//! `Outcome`. Nothing past this boundary sees an `Err`: every failure path
//! becomes a `Failure` outcome.
//!
//! Event order for one session:
//! `StatusChanged(InProgress)`, stage/progress events,
//! `ProgressResolved`, `StatusChanged(Complete | Error)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use trustscope_client::{AdapterRegistry, AnalysisBackend, ToolAdapter};
use trustscope_core::normalizer::outcome_from;
use trustscope_core::{
    default_stages, normalize_with, AnalysisInput, Outcome, Payload, RawFailure, SessionEvent,
    SessionStatus, Tier, ToolKind,
};

use crate::models::session::AnalysisSession;
use crate::services::progress::{ProgressSimulator, ProgressSnapshot};
use crate::services::result_store::ResultStore;

/// Event channel capacity; slow subscribers lag rather than block.
const EVENT_CAPACITY: usize = 256;

/// What a `submit` call resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmitResult {
    /// A session for the tool was already in flight; nothing was sent.
    Rejected,
    /// The session reached a terminal state.
    Finished { session_id: String, outcome: Outcome },
    /// The session was cancelled while in flight; its reply was dropped.
    Discarded { session_id: String },
}

impl SubmitResult {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            SubmitResult::Finished { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitResult::Rejected)
    }
}

struct SessionSlot {
    session: AnalysisSession,
    simulator: ProgressSimulator,
}

/// Held across the backend call. If the `submit` future is dropped before the
/// reply resolves, the session is superseded so the slot frees up.
struct InFlight<'a> {
    gateway: &'a RequestGateway,
    tool: ToolKind,
    session_id: String,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) -> String {
        self.armed = false;
        std::mem::take(&mut self.session_id)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.gateway.lock_slots();
        if let Some(slot) = slots.get_mut(&self.tool) {
            if slot.session.id == self.session_id && slot.session.is_active() {
                slot.session.superseded = true;
                slot.simulator.cancel();
                tracing::info!(
                    tool = %self.tool,
                    session_id = %self.session_id,
                    "submit dropped before reply; session superseded"
                );
            }
        }
    }
}

/// Tool-agnostic orchestrator for analysis sessions.
pub struct RequestGateway {
    backend: Arc<dyn AnalysisBackend>,
    adapters: AdapterRegistry,
    store: ResultStore,
    events: broadcast::Sender<SessionEvent>,
    slots: Mutex<HashMap<ToolKind, SessionSlot>>,
    tick: Duration,
}

impl RequestGateway {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        adapters: AdapterRegistry,
        store: ResultStore,
        tick: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            adapters,
            store,
            events,
            slots: Mutex::new(HashMap::new()),
            tick,
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<ToolKind, SessionSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit_status(&self, session: &AnalysisSession) {
        let _ = self.events.send(SessionEvent::StatusChanged {
            session_id: session.id.clone(),
            tool: session.tool_kind,
            status: session.status,
        });
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Whether a session for `tool` is in flight.
    pub fn is_busy(&self, tool: ToolKind) -> bool {
        self.lock_slots()
            .get(&tool)
            .map(|slot| slot.session.is_active())
            .unwrap_or(false)
    }

    /// Snapshot of the current session for `tool`, with the live stage index.
    ///
    /// A cancelled session keeps `status == InProgress` with `superseded` set,
    /// since no outcome ever reaches it. Check `is_active()` on the snapshot
    /// (or `is_busy`) to tell whether the tool is actually in flight.
    pub fn session(&self, tool: ToolKind) -> Option<AnalysisSession> {
        let slots = self.lock_slots();
        slots.get(&tool).map(|slot| {
            let mut session = slot.session.clone();
            if session.status == SessionStatus::InProgress {
                session.current_stage_index = slot.simulator.snapshot().stage_index;
            }
            session
        })
    }

    pub fn progress(&self, tool: ToolKind) -> Option<ProgressSnapshot> {
        self.lock_slots()
            .get(&tool)
            .map(|slot| slot.simulator.snapshot())
    }

    /// Run one analysis for `tool`.
    pub async fn submit(&self, tool: ToolKind, input: AnalysisInput, tier: Tier) -> SubmitResult {
        let adapter = self.adapters.get(tool);
        let stages = adapter
            .as_ref()
            .map(|a| a.stages())
            .unwrap_or_else(|| default_stages(tool));

        let in_flight = {
            let mut slots = self.lock_slots();
            if slots.get(&tool).is_some_and(|slot| slot.session.is_active()) {
                tracing::info!(tool = %tool, "submit rejected: analysis already in progress");
                return SubmitResult::Rejected;
            }

            let mut session = AnalysisSession::new(tool, tier, input.describe(), stages.clone());
            session.transition(SessionStatus::InProgress);
            let simulator =
                ProgressSimulator::new(session.id.clone(), tool, self.events.clone(), self.tick);

            tracing::info!(
                tool = %tool,
                session_id = %session.id,
                tier = tier.as_str(),
                input = %session.input,
                "analysis submitted"
            );

            self.emit_status(&session);
            simulator.start(stages);

            let id = session.id.clone();
            // Replacing a finished or superseded slot drops its simulator.
            slots.insert(tool, SessionSlot { session, simulator });
            InFlight {
                gateway: self,
                tool,
                session_id: id,
                armed: true,
            }
        };

        let result = match adapter {
            Some(adapter) => self.call(adapter.as_ref(), &input, tier).await,
            None => Err(RawFailure::Request {
                message: format!("No adapter registered for {}", tool),
            }),
        };

        let session_id = in_flight.disarm();
        self.finish(tool, &session_id, outcome_from(result))
    }

    async fn call(
        &self,
        adapter: &dyn ToolAdapter,
        input: &AnalysisInput,
        tier: Tier,
    ) -> Result<Payload, RawFailure> {
        let body = adapter
            .build_request(input, tier)
            .map_err(|e| RawFailure::Request {
                message: e.to_string(),
            })?;

        tracing::debug!(
            tool = %adapter.kind(),
            endpoint = adapter.endpoint(),
            multipart = body.is_multipart(),
            "issuing analysis call"
        );

        let reply = self.backend.submit(adapter.endpoint(), body).await?;
        normalize_with(&reply, adapter.accept_rule())
    }

    fn finish(&self, tool: ToolKind, session_id: &str, outcome: Outcome) -> SubmitResult {
        let mut slots = self.lock_slots();
        let slot = match slots.get_mut(&tool) {
            Some(slot) if slot.session.id == session_id && !slot.session.superseded => slot,
            _ => {
                tracing::info!(tool = %tool, session_id, "reply discarded for superseded session");
                return SubmitResult::Discarded {
                    session_id: session_id.to_string(),
                };
            }
        };

        // Progress resolves before the status changes.
        slot.simulator.force_complete();

        match &outcome {
            Outcome::Success { payload } => {
                self.store.set(tool, payload.clone());
                tracing::info!(
                    tool = %tool,
                    session_id,
                    elapsed_ms = slot.session.elapsed_ms(),
                    "analysis complete"
                );
            }
            Outcome::Failure {
                kind,
                message,
                detail,
            } => {
                tracing::warn!(
                    tool = %tool,
                    session_id,
                    kind = %kind,
                    message = %message,
                    detail = detail.as_deref().unwrap_or(""),
                    "analysis failed"
                );
            }
        }

        slot.session.finish(outcome.clone());
        self.emit_status(&slot.session);

        SubmitResult::Finished {
            session_id: session_id.to_string(),
            outcome,
        }
    }

    /// Supersede the in-flight session for `tool`. Its simulator stops and its
    /// eventual reply is discarded; the slot is free immediately.
    pub fn cancel(&self, tool: ToolKind) -> bool {
        let mut slots = self.lock_slots();
        match slots.get_mut(&tool) {
            Some(slot) if slot.session.is_active() => {
                slot.session.superseded = true;
                slot.simulator.cancel();
                tracing::info!(tool = %tool, session_id = %slot.session.id, "analysis cancelled");
                true
            }
            _ => false,
        }
    }

    /// Clear the stored result and drop a session that is no longer in flight.
    /// Returns whether a session was dropped.
    pub fn reset(&self, tool: ToolKind) -> bool {
        self.store.clear(tool);
        let mut slots = self.lock_slots();
        if slots.get(&tool).is_some_and(|slot| !slot.session.is_active()) {
            slots.remove(&tool);
            tracing::debug!(tool = %tool, "session reset");
            return true;
        }
        false
    }
}
