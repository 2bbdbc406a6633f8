//! Unified multi-signal analysis (`/api/analyze-unified`).

use serde_json::json;

use trustscope_core::{AnalysisInput, CoreError, CoreResult, Payload, RequestBody, Tier, ToolKind};

use crate::adapter::{export_results, ToolAdapter};

const DEFAULT_ANALYSIS_TYPE: &str = "comprehensive";

/// Accepts text or a URL; `analysis_type` selects the server-side profile.
#[derive(Debug, Clone)]
pub struct UnifiedAdapter {
    analysis_type: String,
}

impl UnifiedAdapter {
    pub fn new(analysis_type: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
        }
    }
}

impl Default for UnifiedAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_TYPE)
    }
}

impl ToolAdapter for UnifiedAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Unified
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-unified"
    }

    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody> {
        let content = match input {
            AnalysisInput::Text(text) | AnalysisInput::Url(text) => text,
            AnalysisInput::File(_) => {
                return Err(CoreError::unsupported_input(
                    "unified analysis takes text or a URL, not a file",
                ))
            }
        };
        if content.trim().is_empty() {
            return Err(CoreError::validation("content is empty"));
        }

        Ok(RequestBody::Json(json!({
            "content": content,
            "type": input.content_type(),
            "is_pro": tier.is_pro(),
            "analysis_type": self.analysis_type,
        })))
    }

    fn pdf_endpoint(&self) -> &'static str {
        "/api/generate-unified-pdf"
    }

    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value {
        json!({
            "results": export_results(payload),
            "type": self.analysis_type,
            "timestamp": timestamp,
        })
    }
}
