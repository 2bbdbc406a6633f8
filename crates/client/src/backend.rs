//! Analysis Backend
//!
//! The seam between the orchestrator and the wire. `AnalysisBackend` is what
//! the request gateway talks to; `HttpBackend` is the real implementation and
//! tests substitute their own.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use url::Url;

use trustscope_core::{MultipartPart, RawFailure, RawReply, RequestBody};

use crate::error::{parse_http_error, ClientError, ClientResult};

/// Transport used by the request gateway and the export service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Issue one analysis request. Returns the raw status and body for any
    /// reply that was received; only failures to send or read are `Err`.
    async fn submit(&self, endpoint: &str, body: RequestBody) -> Result<RawReply, RawFailure>;

    /// POST a JSON body and return the binary reply (PDF export).
    async fn download(&self, endpoint: &str, body: serde_json::Value) -> ClientResult<Vec<u8>>;
}

/// `reqwest`-backed implementation.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// `base_url` is the service origin, e.g. `https://api.example.com`.
    /// Endpoint paths are absolute and replace any path on the base.
    pub fn new(base_url: &str, client: reqwest::Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config {
                message: format!("Unsupported base URL scheme: {}", base_url.scheme()),
            });
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn endpoint_url(&self, endpoint: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// POST with a JSON body. `.json()` sets the content type.
    pub fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> reqwest::RequestBuilder {
        self.client.post(url).json(body)
    }

    fn build_form(parts: Vec<MultipartPart>) -> Result<Form, RawFailure> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File { name, file } => {
                    let mime = file.mime_type.clone().unwrap_or_else(|| {
                        mime_guess::from_path(&file.file_name)
                            .first_or_octet_stream()
                            .to_string()
                    });
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&mime)
                        .map_err(|e| RawFailure::Request {
                            message: format!("Invalid MIME type {}: {}", mime, e),
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn submit(&self, endpoint: &str, body: RequestBody) -> Result<RawReply, RawFailure> {
        let url = self.endpoint_url(endpoint).map_err(|e| RawFailure::Request {
            message: e.to_string(),
        })?;

        let request = match body {
            RequestBody::Json(value) => self.post_json(url, &value),
            // No explicit content-type: reqwest writes the boundary header.
            RequestBody::Multipart(parts) => self.client.post(url).multipart(Self::build_form(parts)?),
        };

        tracing::debug!(endpoint, "sending analysis request");

        let response = request.send().await.map_err(|e| RawFailure::Transport {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| RawFailure::Transport {
            message: e.to_string(),
        })?;

        tracing::debug!(endpoint, status, bytes = body.len(), "analysis reply received");
        Ok(RawReply { status, body })
    }

    async fn download(&self, endpoint: &str, body: serde_json::Value) -> ClientResult<Vec<u8>> {
        let url = self.endpoint_url(endpoint)?;
        let response = self.post_json(url, &body).send().await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &text));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
