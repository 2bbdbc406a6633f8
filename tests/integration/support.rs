//! Scripted backend shared by the integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use trustscope::{RequestGateway, ResultStore};
use trustscope_client::{AdapterRegistry, AnalysisBackend, ClientError, ClientResult};
use trustscope_core::{Payload, RawFailure, RawReply, RequestBody, SessionEvent};

/// Tick used by gateway tests; coarse enough that the event channel never lags.
pub const TICK: Duration = Duration::from_millis(250);

struct Scripted {
    delay: Duration,
    reply: Result<RawReply, RawFailure>,
}

/// Backend that replays scripted replies in order and records every call.
#[derive(Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, RequestBody)>>,
    downloads: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str, delay: Duration) -> &Self {
        self.script.lock().unwrap().push_back(Scripted {
            delay,
            reply: Ok(RawReply::new(status, body)),
        });
        self
    }

    pub fn fail(&self, failure: RawFailure, delay: Duration) -> &Self {
        self.script.lock().unwrap().push_back(Scripted {
            delay,
            reply: Err(failure),
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, RequestBody)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<(String, serde_json::Value)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn submit(&self, endpoint: &str, body: RequestBody) -> Result<RawReply, RawFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted { delay, reply }) => {
                tokio::time::sleep(delay).await;
                reply
            }
            None => Err(RawFailure::Transport {
                message: "no scripted reply".to_string(),
            }),
        }
    }

    async fn download(&self, endpoint: &str, body: serde_json::Value) -> ClientResult<Vec<u8>> {
        if body.get("results").is_none() {
            return Err(ClientError::ServerError {
                status: 400,
                message: "missing results".to_string(),
            });
        }
        self.downloads
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body));
        Ok(b"%PDF-1.7 report".to_vec())
    }
}

pub fn gateway(backend: Arc<MockBackend>) -> Arc<RequestGateway> {
    Arc::new(RequestGateway::new(
        backend,
        AdapterRegistry::with_defaults(),
        ResultStore::new(),
        TICK,
    ))
}

pub fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Everything currently buffered on the receiver.
pub fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
