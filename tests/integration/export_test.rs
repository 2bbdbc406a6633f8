//! Export & Share Integration Tests
//!
//! PDF export reads only what the gateway stored.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use trustscope::services::share_text;
use trustscope::{AppError, Services};
use trustscope_client::{AdapterRegistry, ClientError};
use trustscope_core::{AnalysisInput, FileInput, Tier, ToolKind};

use super::support::{MockBackend, TICK};

fn services(backend: Arc<MockBackend>) -> Services {
    Services::with_backend(backend, AdapterRegistry::with_defaults(), TICK)
}

#[tokio::test(start_paused = true)]
async fn test_export_after_success() {
    let backend = MockBackend::new();
    backend.reply(
        200,
        r#"{"success":true,"results":{"trust_score":64,"verdict":"mixed"}}"#,
        Duration::from_millis(200),
    );
    let services = services(backend.clone());

    services
        .gateway
        .submit(
            ToolKind::Speech,
            AnalysisInput::File(FileInput::new("talk.mp3", vec![1, 2, 3])),
            Tier::Pro,
        )
        .await;

    let pdf = services.export.generate_pdf(ToolKind::Speech).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let downloads = backend.downloads();
    let (endpoint, body) = &downloads[0];
    assert_eq!(endpoint, "/api/generate-speech-pdf");
    assert_eq!(body["results"], json!({"trust_score": 64, "verdict": "mixed"}));
    assert_eq!(body["type"], "upload");
}

#[tokio::test(start_paused = true)]
async fn test_export_without_success_is_error() {
    let backend = MockBackend::new();
    backend.reply(503, r#"{"error":"maintenance"}"#, Duration::from_millis(10));
    let services = services(backend.clone());

    services
        .gateway
        .submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Free)
        .await;

    let err = services.export.generate_pdf(ToolKind::News).await.unwrap_err();
    assert!(matches!(err, AppError::Client(ClientError::NoResult { .. })));
    assert!(backend.downloads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_export_after_reset_is_error() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":70}"#, Duration::from_millis(10));
    let services = services(backend);

    services
        .gateway
        .submit(ToolKind::Unified, AnalysisInput::Text("x".into()), Tier::Free)
        .await;
    assert!(services.store.get(ToolKind::Unified).is_some());

    services.gateway.reset(ToolKind::Unified);
    assert!(services.export.generate_pdf(ToolKind::Unified).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_share_reads_stored_payload() {
    let backend = MockBackend::new();
    backend.reply(200, r#"{"trust_score":72,"summary":"ok"}"#, Duration::from_millis(10));
    let services = services(backend);

    services
        .gateway
        .submit(ToolKind::News, AnalysisInput::Text("x".into()), Tier::Pro)
        .await;

    let payload = services.store.get(ToolKind::News).unwrap();
    let text = share_text(ToolKind::News, &payload);
    assert!(text.contains("News Analysis"));
    assert!(text.contains("72/100"));
}
