//! Account & Auxiliary Endpoints
//!
//! Thin JSON clients for the endpoints around the analysis core: session
//! status, usage tracking, contact form, and beta signup. None of these take
//! part in the analysis session lifecycle.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use trustscope_core::{Tier, ToolKind};

use crate::backend::HttpBackend;
use crate::error::{parse_http_error, ClientError, ClientResult};

/// `GET /api/user/status` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub usage_today: u32,
    #[serde(default)]
    pub daily_limit: Option<u32>,
}

impl UserStatus {
    /// Plan mapped to a tier; anything other than "pro" is free.
    pub fn tier(&self) -> Tier {
        match self.plan.as_deref() {
            Some(plan) if plan.eq_ignore_ascii_case("pro") => Tier::Pro,
            _ => Tier::Free,
        }
    }

    /// Remaining analyses today, if the plan is limited.
    pub fn remaining_today(&self) -> Option<u32> {
        self.daily_limit
            .map(|limit| limit.saturating_sub(self.usage_today))
    }
}

#[derive(Debug, Serialize)]
struct TrackUsageRequest<'a> {
    tool: &'a str,
}

/// Contact form submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct BetaSignupRequest<'a> {
    email: &'a str,
}

/// Client for the account endpoints.
#[derive(Clone)]
pub struct AccountClient {
    backend: HttpBackend,
}

impl AccountClient {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_reply(status, &text)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<serde_json::Value> {
        let url = self.backend.endpoint_url(endpoint)?;
        let response = self.backend.post_json(url, body).send().await?;
        Self::read_json(response).await
    }

    pub async fn user_status(&self) -> ClientResult<UserStatus> {
        let url = self.backend.endpoint_url("/api/user/status")?;
        let response = self.backend.client().get(url).send().await?;
        Self::read_json(response).await
    }

    pub async fn track_usage(&self, tool: ToolKind) -> ClientResult<serde_json::Value> {
        self.post(
            "/api/track-usage",
            &TrackUsageRequest {
                tool: tool.as_str(),
            },
        )
        .await
    }

    pub async fn contact(&self, request: &ContactRequest) -> ClientResult<serde_json::Value> {
        self.post("/api/contact", request).await
    }

    pub async fn beta_signup(&self, email: &str) -> ClientResult<serde_json::Value> {
        self.post("/api/beta-signup", &BetaSignupRequest { email })
            .await
    }
}

/// Non-2xx goes through `parse_http_error`; a 2xx body must match `T`.
fn decode_reply<T: DeserializeOwned>(status: u16, text: &str) -> ClientResult<T> {
    if !(200..300).contains(&status) {
        return Err(parse_http_error(status, text));
    }
    serde_json::from_str(text).map_err(|e| ClientError::ParseError {
        message: format!("Failed to parse response: {}", e),
    })
}
