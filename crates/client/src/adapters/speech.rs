//! Speech analysis: uploaded audio/video (`/api/analyze-speech`, multipart)
//! and YouTube links (`/api/analyze-youtube-speech`, JSON). Both export via
//! the speech PDF endpoint.

use serde_json::json;

use trustscope_core::{
    AnalysisInput, CoreError, CoreResult, MultipartPart, Payload, RequestBody, Tier, ToolKind,
};

use crate::adapter::{export_results, ToolAdapter};

const SPEECH_PDF_ENDPOINT: &str = "/api/generate-speech-pdf";

fn speech_pdf_request(payload: &Payload, source: &str, timestamp: &str) -> serde_json::Value {
    json!({
        "results": export_results(payload),
        "type": source,
        "timestamp": timestamp,
    })
}

/// Uploaded audio or video file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeechAdapter;

impl ToolAdapter for SpeechAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::Speech
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-speech"
    }

    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody> {
        let AnalysisInput::File(file) = input else {
            return Err(CoreError::unsupported_input(
                "speech analysis requires an audio or video file",
            ));
        };
        if file.bytes.is_empty() {
            return Err(CoreError::validation("audio file is empty"));
        }

        Ok(RequestBody::Multipart(vec![
            MultipartPart::File {
                name: "file".to_string(),
                file: file.clone(),
            },
            MultipartPart::Text {
                name: "tier".to_string(),
                value: tier.as_str().to_string(),
            },
        ]))
    }

    fn pdf_endpoint(&self) -> &'static str {
        SPEECH_PDF_ENDPOINT
    }

    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value {
        speech_pdf_request(payload, "upload", timestamp)
    }
}

/// YouTube video URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct YoutubeSpeechAdapter;

impl YoutubeSpeechAdapter {
    fn is_youtube_url(url: &str) -> bool {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| {
                host == "youtu.be"
                    || host == "youtube.com"
                    || host.ends_with(".youtube.com")
            })
    }
}

impl ToolAdapter for YoutubeSpeechAdapter {
    fn kind(&self) -> ToolKind {
        ToolKind::YoutubeSpeech
    }

    fn endpoint(&self) -> &'static str {
        "/api/analyze-youtube-speech"
    }

    fn build_request(&self, input: &AnalysisInput, tier: Tier) -> CoreResult<RequestBody> {
        let AnalysisInput::Url(url) = input else {
            return Err(CoreError::unsupported_input(
                "YouTube speech analysis requires a video URL",
            ));
        };
        if !Self::is_youtube_url(url) {
            return Err(CoreError::validation(format!(
                "not a YouTube URL: {}",
                url
            )));
        }

        Ok(RequestBody::Json(json!({
            "url": url,
            "tier": tier.as_str(),
        })))
    }

    fn pdf_endpoint(&self) -> &'static str {
        SPEECH_PDF_ENDPOINT
    }

    fn pdf_request(&self, payload: &Payload, timestamp: &str) -> serde_json::Value {
        speech_pdf_request(payload, "youtube", timestamp)
    }
}
