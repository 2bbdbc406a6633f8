//! Progress Integration Tests
//!
//! Event ordering between the simulator and the session, and custom stages.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use trustscope::services::HOLD_PERCENT;
use trustscope::{RequestGateway, ResultStore};
use trustscope_client::{AdapterRegistry, ToolAdapter};
use trustscope_core::{
    AcceptRule, AnalysisInput, CoreResult, Payload, ProgressResolution, RequestBody,
    SessionEvent, SessionStatus, StageSpec, Tier, ToolKind,
};

use super::support::{drain, gateway, MockBackend, TICK};

/// Position of the simulator's terminal event and of the terminal status.
fn resolution_order(events: &[SessionEvent]) -> (usize, usize) {
    let resolved = events
        .iter()
        .position(|e| matches!(e, SessionEvent::ProgressResolved { .. }))
        .expect("progress resolved");
    let status = events
        .iter()
        .position(SessionEvent::is_terminal_status)
        .expect("terminal status");
    (resolved, status)
}

fn assert_no_progress_after_resolution(events: &[SessionEvent]) {
    let (resolved, _) = resolution_order(events);
    assert!(!events[resolved + 1..].iter().any(|e| matches!(
        e,
        SessionEvent::Progress { .. } | SessionEvent::StageAdvanced { .. }
    )));
}

#[tokio::test(start_paused = true)]
async fn test_progress_resolves_before_status_with_zero_latency() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":50}"#, Duration::ZERO);
    let gw = gateway(backend);
    let mut rx = gw.subscribe();

    gw.submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
        .await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    let events = drain(&mut rx);
    assert!(matches!(
        events.first(),
        Some(SessionEvent::StatusChanged {
            status: SessionStatus::InProgress,
            ..
        })
    ));
    let (resolved, status) = resolution_order(&events);
    assert!(resolved < status);
    assert_no_progress_after_resolution(&events);
}

#[tokio::test(start_paused = true)]
async fn test_progress_holds_then_resolves_with_large_latency() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"results":{"x":1}}"#, Duration::from_secs(60));
    let gw = gateway(backend);
    let mut rx = gw.subscribe();

    gw.submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
        .await;

    let events = drain(&mut rx);
    let (resolved, status) = resolution_order(&events);
    assert!(resolved < status);
    assert_no_progress_after_resolution(&events);

    let readouts: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(readouts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(readouts.last().copied(), Some(HOLD_PERCENT));

    match &events[resolved] {
        SessionEvent::ProgressResolved {
            percent,
            resolution,
            ..
        } => {
            assert_eq!(*percent, 100.0);
            assert_eq!(*resolution, ProgressResolution::Completed);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let stages: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::StageAdvanced { stage_index, .. } => Some(*stage_index),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec![0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_session_snapshot_tracks_stage() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":50}"#, Duration::from_secs(20));
    let gw = gateway(backend);

    let task = {
        let gw = gw.clone();
        tokio::spawn(async move {
            gw.submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
                .await
        })
    };

    // News stages end at 1.5s, 4.0s, 7.5s, ...
    tokio::time::sleep(Duration::from_secs(5)).await;
    let session = gw.session(ToolKind::News).unwrap();
    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.current_stage_index, 2);

    let snapshot = gw.progress(ToolKind::News).unwrap();
    assert_eq!(snapshot.completed_stages, 2);
    assert!(snapshot.percent > 0.0 && snapshot.percent < HOLD_PERCENT);

    task.await.unwrap();
    let snapshot = gw.progress(ToolKind::News).unwrap();
    assert_eq!(snapshot.completed_stages, snapshot.stage_count);
    assert_eq!(snapshot.percent, 100.0);
}

// ============================================================================
// Custom adapter
// ============================================================================

fn accepts_ok_flag(body: &Payload) -> bool {
    body.get("ok") == Some(&json!(true))
}

/// Two quick stages and a bespoke acceptance rule.
struct QuickNewsAdapter;

impl ToolAdapter for QuickNewsAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::News
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-news"
    }

    fn build_request(&self, _input: &AnalysisInput, _tier: Tier) -> CoreResult<RequestBody> {
        Ok(RequestBody::Json(json!({"content": "x"})))
    }

    fn stages(&self) -> Vec<StageSpec> {
        vec![
            StageSpec::new("one", "One", 300),
            StageSpec::new("two", "Two", 300),
        ]
    }

    fn accept_rule(&self) -> AcceptRule {
        accepts_ok_flag
    }

    fn pdf_endpoint(&self) -> &'static str {
        "/api/generate-pdf"
    }

    fn pdf_request(&self, payload: &Payload, _timestamp: &str) -> serde_json::Value {
        json!({ "results": payload })
    }
}

#[tokio::test(start_paused = true)]
async fn test_adapter_overrides_stages_and_acceptance() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"ok":true}"#, Duration::from_secs(2))
        .reply(200, r#"{"trust_score":99}"#, Duration::from_millis(10));

    let mut adapters = AdapterRegistry::with_defaults();
    adapters.register(Arc::new(QuickNewsAdapter));
    let gw = RequestGateway::new(backend, adapters, ResultStore::new(), TICK);
    let mut rx = gw.subscribe();

    let first = gw
        .submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
        .await;
    assert!(first.outcome().unwrap().is_success());
    assert_eq!(gw.session(ToolKind::News).unwrap().stages.len(), 2);

    let labels: Vec<String> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::StageAdvanced { label, .. } => Some(label),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["One".to_string(), "Two".to_string()]);

    // The default rule would accept a numeric trust score; this adapter does not.
    let second = gw
        .submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
        .await;
    assert!(!second.outcome().unwrap().is_success());
}
