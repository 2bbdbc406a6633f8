//! Image authenticity analysis (`/api/analyze-image`, multipart).

use serde_json::json;

use trustscope_core::{
    AnalysisInput, CoreError, CoreResult, MultipartPart, Payload, RequestBody, Tier, ToolKind,
};

use crate::adapter::{export_results, ToolAdapter};

const DEFAULT_ANALYSIS_TYPE: &str = "comprehensive";

/// Accepts a file only.
#[derive(Debug, Clone)]
pub struct ImageAdapter {
    analysis_type: String,
}

impl ImageAdapter {
    pub fn new(analysis_type: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
        }
    }

    pub fn analysis_type(&self) -> &str {
        &self.analysis_type
    }
}

impl Default for ImageAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_TYPE)
    }
}

impl ToolAdapter for ImageAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Image
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-image"
    }

    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody> {
        let AnalysisInput::File(file) = input else {
            return Err(CoreError::unsupported_input(
                "image analysis requires an image file",
            ));
        };
        if file.bytes.is_empty() {
            return Err(CoreError::validation("image file is empty"));
        }

        Ok(RequestBody::Multipart(vec![
            MultipartPart::File {
                name: "image".to_string(),
                file: file.clone(),
            },
            MultipartPart::Text {
                name: "tier".to_string(),
                value: tier.as_str().to_string(),
            },
            MultipartPart::Text {
                name: "analysisType".to_string(),
                value: self.analysis_type.clone(),
            },
        ]))
    }

    fn pdf_endpoint(&self) -> &'static str {
        "/api/generate-pdf"
    }

    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value {
        json!({
            "results": export_results(payload),
            "analysis_type": "image",
            "timestamp": timestamp,
        })
    }
}
