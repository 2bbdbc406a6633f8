//! News article / claim analysis (`/api/analyze-news`).

use serde_json::json;

use trustscope_core::{AnalysisInput, CoreError, CoreResult, Payload, RequestBody, Tier, ToolKind};

use crate::adapter::{export_results, ToolAdapter};

/// Accepts text or a URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsAdapter;

impl ToolAdapter for NewsAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::News
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-news"
    }

    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody> {
        let content = match input {
            AnalysisInput::Text(text) | AnalysisInput::Url(text) => text,
            AnalysisInput::File(_) => {
                return Err(CoreError::unsupported_input(
                    "news analysis takes text or a URL, not a file",
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
        })))
    }

    fn pdf_endpoint(&self) -> &'static str {
        "/api/generate-pdf"
    }

    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value {
        json!({
            "results": export_results(payload),
            "analysis_type": "news",
            "timestamp": timestamp,
        })
    }
}
