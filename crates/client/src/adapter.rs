//! Tool Adapter Trait
//!
//! Everything that differs between tools lives behind `ToolAdapter`: endpoint,
//! request body shape, progress stages, acceptance rule, and PDF export. The
//! gateway itself is tool-agnostic.

use std::collections::HashMap;
use std::sync::Arc;

use trustscope_core::{
    accepts, default_stages, AcceptRule, AnalysisInput, CoreResult, Payload, RequestBody,
    StageSpec, Tier, ToolKind,
};

use crate::adapters::{ImageAdapter, NewsAdapter, SpeechAdapter, UnifiedAdapter, YoutubeSpeechAdapter};

/// Per-tool capability set.
pub trait ToolAdapter: Send + Sync {
    fn kind(&self) -> ToolKind;

    /// Analysis endpoint path, e.g. `/api/analyze-news`.
    fn endpoint(&self) -> &'static str;

    /// Build the request body. Fails for input the tool does not take.
    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody>;

    fn stages(&self) -> Vec<StageSpec> {
        default_stages(self.kind())
    }

    /// Acceptance predicate applied to 2xx replies.
    fn accept_rule(&self) -> AcceptRule {
        accepts
    }

    /// PDF export endpoint path.
    fn pdf_endpoint(&self) -> &'static str;

    /// PDF export request body for a stored payload.
    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value;
}

/// The part of a payload the PDF endpoints expect under `results`: the nested
/// `results` object when the reply had one, otherwise the whole reply.
pub fn export_results(payload: &Payload) -> serde_json::Value {
    match payload.get("results") {
        Some(results) if !results.is_null() => results.clone(),
        _ => serde_json::Value::Object(payload.clone()),
    }
}

/// Lookup table from tool kind to adapter.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<ToolKind, Arc<dyn ToolAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with the built-in adapter for every tool.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ImageAdapter::default()));
        registry.register(Arc::new(NewsAdapter));
        registry.register(Arc::new(SpeechAdapter));
        registry.register(Arc::new(YoutubeSpeechAdapter));
        registry.register(Arc::new(UnifiedAdapter::default()));
        registry
    }

    /// Insert or replace the adapter for its tool kind.
    pub fn register(&mut self, adapter: Arc<dyn ToolAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    pub fn get(&self, kind: ToolKind) -> Option<Arc<dyn ToolAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
