//! Request Gateway Integration Tests
//!
//! Submit lifecycle, single-flight, failure classification, and cancellation.

use std::time::Duration;

use serde_json::json;

use trustscope::services::SimulatorPhase;
use trustscope::SubmitResult;
use trustscope_core::{
    AnalysisInput, FailureKind, FileInput, MultipartPart, Outcome, RawFailure, RequestBody,
    SessionEvent, SessionStatus, Tier, ToolKind,
};

use super::support::{drain, gateway, payload, MockBackend};

fn text(s: &str) -> AnalysisInput {
    AnalysisInput::Text(s.to_string())
}

fn image() -> AnalysisInput {
    AnalysisInput::File(FileInput::new("huge.png", vec![0u8; 64]))
}

// ============================================================================
// Single-flight
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_concurrent_submit_is_rejected() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":72}"#, Duration::from_secs(2));
    let gw = gateway(backend.clone());

    let first = {
        let gw = gw.clone();
        tokio::spawn(async move { gw.submit(ToolKind::News, text("first"), Tier::Free).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(gw.is_busy(ToolKind::News));

    let second = gw.submit(ToolKind::News, text("second"), Tier::Free).await;
    assert_eq!(second, SubmitResult::Rejected);

    let first = first.await.unwrap();
    assert!(first.outcome().unwrap().is_success());
    assert_eq!(backend.call_count(), 1);
    assert!(!gw.is_busy(ToolKind::News));
}

#[tokio::test(start_paused = true)]
async fn test_other_tools_are_independent() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"results":{"a":1}}"#, Duration::from_secs(1))
        .reply(200, r#"{"results":{"b":2}}"#, Duration::from_secs(1));
    let gw = gateway(backend.clone());

    let (news, unified) = tokio::join!(
        gw.submit(ToolKind::News, text("x"), Tier::Free),
        gw.submit(ToolKind::Unified, text("y"), Tier::Free),
    );
    assert!(news.outcome().unwrap().is_success());
    assert!(unified.outcome().unwrap().is_success());
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_resubmit_after_completion_creates_fresh_session() {
    let backend = MockBackend::new();
    backend
        .reply(500, r#"{"error":"internal"}"#, Duration::from_millis(50))
        .reply(200, r#"{"trust_score":80}"#, Duration::from_millis(50));
    let gw = gateway(backend.clone());

    let SubmitResult::Finished { session_id: first, .. } =
        gw.submit(ToolKind::News, text("x"), Tier::Free).await
    else {
        panic!("first submit should finish");
    };
    assert_eq!(gw.session(ToolKind::News).unwrap().status, SessionStatus::Error);

    let SubmitResult::Finished { session_id: second, outcome } =
        gw.submit(ToolKind::News, text("x"), Tier::Free).await
    else {
        panic!("retry should finish");
    };
    assert_ne!(first, second);
    assert!(outcome.is_success());
    assert_eq!(gw.session(ToolKind::News).unwrap().id, second);
    assert_eq!(backend.call_count(), 2);
}

// ============================================================================
// Result store
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_result_store_last_write_wins() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"trust_score":10}"#, Duration::from_millis(10))
        .reply(200, r#"{"trust_score":90}"#, Duration::from_millis(10));
    let gw = gateway(backend);

    gw.submit(ToolKind::News, text("a"), Tier::Free).await;
    gw.submit(ToolKind::News, text("b"), Tier::Free).await;
    assert_eq!(
        gw.store().get(ToolKind::News),
        Some(payload(json!({"trust_score": 90})))
    );
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_news_text_pro_success() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":72,"summary":"ok"}"#, Duration::from_millis(100));
    let gw = gateway(backend.clone());

    let result = gw
        .submit(ToolKind::News, text("Breaking: ..."), Tier::Pro)
        .await;

    let expected = payload(json!({"trust_score": 72, "summary": "ok"}));
    assert_eq!(result.outcome(), Some(&Outcome::success(expected.clone())));
    assert_eq!(gw.store().get(ToolKind::News), Some(expected));

    let session = gw.session(ToolKind::News).unwrap();
    assert_eq!(session.status, SessionStatus::Complete);
    assert_eq!(session.current_stage_index, session.stages.len() - 1);
    assert_eq!(gw.progress(ToolKind::News).unwrap().percent, 100.0);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let (endpoint, body) = &requests[0];
    assert_eq!(endpoint, "/api/analyze-news");
    let RequestBody::Json(body) = body else {
        panic!("news requests are JSON");
    };
    assert_eq!(body["type"], "text");
    assert_eq!(body["is_pro"], true);
}

#[tokio::test(start_paused = true)]
async fn test_file_too_large_is_size_limit_error() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"results":{"verdict":"authentic"}}"#, Duration::from_millis(10))
        .reply(
            500,
            r#"{"error":"file too large, max size exceeded"}"#,
            Duration::from_millis(10),
        );
    let gw = gateway(backend.clone());

    gw.submit(ToolKind::Image, image(), Tier::Free).await;
    let before = gw.store().get(ToolKind::Image);
    assert!(before.is_some());

    let result = gw.submit(ToolKind::Image, image(), Tier::Free).await;
    match result.outcome() {
        Some(Outcome::Failure { kind, message, detail }) => {
            assert_eq!(*kind, FailureKind::SizeLimitError);
            assert_eq!(message, FailureKind::SizeLimitError.template());
            assert!(detail
                .as_deref()
                .is_some_and(|d| d.contains("max size exceeded")));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(gw.store().get(ToolKind::Image), before);
    assert_eq!(gw.session(ToolKind::Image).unwrap().status, SessionStatus::Error);

    let (endpoint, body) = &backend.requests()[1];
    assert_eq!(endpoint, "/api/analyze-image");
    let RequestBody::Multipart(parts) = body else {
        panic!("image requests are multipart");
    };
    assert!(parts
        .iter()
        .any(|p| matches!(p, MultipartPart::File { name, .. } if name == "image")));
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_reply_wins_over_message_sniffing() {
    let backend = MockBackend::new();
    backend.reply(500, "file too large: unsupported format", Duration::from_millis(10));
    let gw = gateway(backend);

    let result = gw.submit(ToolKind::News, text("x"), Tier::Free).await;
    let outcome = result.outcome().unwrap();
    assert_eq!(outcome.failure_kind(), Some(FailureKind::ValidationError));
    assert!(matches!(
        outcome,
        Outcome::Failure { message, .. } if message == "Server returned invalid response"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_network_error() {
    let backend = MockBackend::new();
    backend.fail(
        RawFailure::Transport {
            message: "connection refused".to_string(),
        },
        Duration::from_millis(10),
    );
    let gw = gateway(backend);

    let result = gw.submit(ToolKind::Unified, text("x"), Tier::Free).await;
    assert_eq!(
        result.outcome().and_then(Outcome::failure_kind),
        Some(FailureKind::NetworkError)
    );
}

#[tokio::test(start_paused = true)]
async fn test_declared_error_is_analysis_failed() {
    let backend = MockBackend::new();
    backend.reply(
        200,
        r#"{"trust_score":72,"error":"could not verify claims"}"#,
        Duration::from_millis(10),
    );
    let gw = gateway(backend);

    let result = gw.submit(ToolKind::News, text("x"), Tier::Free).await;
    assert_eq!(
        result.outcome().and_then(Outcome::failure_kind),
        Some(FailureKind::AnalysisFailedError)
    );
    assert!(gw.store().get(ToolKind::News).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_request_build_failure_is_outcome_not_error() {
    let backend = MockBackend::new();
    let gw = gateway(backend.clone());

    let mut rx = gw.subscribe();
    let result = gw
        .submit(
            ToolKind::YoutubeSpeech,
            AnalysisInput::Url("https://example.com/video".to_string()),
            Tier::Free,
        )
        .await;

    assert!(matches!(result, SubmitResult::Finished { ref outcome, .. } if !outcome.is_success()));
    assert_eq!(backend.call_count(), 0);
    assert!(drain(&mut rx).iter().any(|e| matches!(
        e,
        SessionEvent::StatusChanged { status: SessionStatus::Error, .. }
    )));
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_late_reply() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"trust_score":1}"#, Duration::from_secs(5))
        .reply(200, r#"{"trust_score":2}"#, Duration::from_millis(100));
    let gw = gateway(backend.clone());
    let mut rx = gw.subscribe();

    let stale = {
        let gw = gw.clone();
        tokio::spawn(async move { gw.submit(ToolKind::News, text("old"), Tier::Free).await })
    };
    tokio::time::sleep(Duration::from_millis(600)).await;
    let stale_id = gw.session(ToolKind::News).unwrap().id;

    assert!(gw.cancel(ToolKind::News));
    assert!(!gw.cancel(ToolKind::News));
    assert!(!gw.is_busy(ToolKind::News));

    // No outcome reaches a superseded session; the flag marks it as dead.
    let snapshot = gw.session(ToolKind::News).unwrap();
    assert!(snapshot.superseded);
    assert!(!snapshot.is_active());
    assert_eq!(snapshot.status, SessionStatus::InProgress);

    // The slot is free before the stale reply lands.
    let fresh = gw.submit(ToolKind::News, text("new"), Tier::Free).await;
    assert!(fresh.outcome().unwrap().is_success());

    let stale = stale.await.unwrap();
    assert_eq!(
        stale,
        SubmitResult::Discarded {
            session_id: stale_id.clone()
        }
    );
    assert_eq!(
        gw.store().get(ToolKind::News),
        Some(payload(json!({"trust_score": 2})))
    );
    assert_eq!(backend.call_count(), 2);

    let stale_events: Vec<SessionEvent> = drain(&mut rx)
        .into_iter()
        .filter(|e| e.session_id() == stale_id)
        .collect();
    assert!(!stale_events.iter().any(SessionEvent::is_terminal_status));
    assert!(matches!(
        stale_events.last(),
        Some(SessionEvent::ProgressResolved { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_submit_frees_slot() {
    let backend = MockBackend::new();
    backend
        .reply(200, r#"{"trust_score":1}"#, Duration::from_secs(5))
        .reply(200, r#"{"trust_score":2}"#, Duration::from_millis(100));
    let gw = gateway(backend.clone());

    let timed_out = tokio::time::timeout(
        Duration::from_secs(1),
        gw.submit(ToolKind::News, text("slow"), Tier::Free),
    )
    .await;
    assert!(timed_out.is_err());
    assert!(!gw.is_busy(ToolKind::News));

    let abandoned = gw.session(ToolKind::News).unwrap();
    assert!(abandoned.superseded);
    assert_eq!(
        gw.progress(ToolKind::News).unwrap().phase,
        SimulatorPhase::Cancelled
    );

    tokio::time::sleep(Duration::from_secs(60)).await;
    let again = gw.submit(ToolKind::News, text("retry"), Tier::Free).await;
    assert_ne!(again, SubmitResult::Rejected);
    assert!(again.outcome().unwrap().is_success());
    assert_eq!(
        gw.store().get(ToolKind::News),
        Some(payload(json!({"trust_score": 2})))
    );
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_store() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"results":{"x":1}}"#, Duration::from_millis(10));
    let gw = gateway(backend);

    gw.submit(ToolKind::Unified, text("x"), Tier::Pro).await;
    assert!(gw.reset(ToolKind::Unified));
    assert!(gw.store().get(ToolKind::Unified).is_none());
    assert!(gw.session(ToolKind::Unified).is_none());
}
