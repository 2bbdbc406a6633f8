//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};

use trustscope_core::{ProxyConfig, Tier};

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Analysis service origin, e.g. "https://api.trustscope.app"
    pub base_url: String,
    /// Tier used when the command line does not say otherwise
    #[serde(default)]
    pub default_tier: Tier,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Progress readout refresh interval in milliseconds
    #[serde(default = "default_progress_tick_ms")]
    pub progress_tick_ms: u64,
    /// Optional outbound proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Enable debug logging
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_progress_tick_ms() -> u64 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            default_tier: Tier::Free,
            request_timeout_secs: 120,
            progress_tick_ms: default_progress_tick_ms(),
            proxy: None,
            debug_mode: false,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub base_url: Option<String>,
    pub default_tier: Option<Tier>,
    pub request_timeout_secs: Option<u64>,
    pub progress_tick_ms: Option<u64>,
    /// `Some(None)` removes the proxy.
    pub proxy: Option<Option<ProxyConfig>>,
    pub debug_mode: Option<bool>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(base_url) = update.base_url {
            self.base_url = base_url;
        }
        if let Some(tier) = update.default_tier {
            self.default_tier = tier;
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(tick) = update.progress_tick_ms {
            self.progress_tick_ms = tick;
        }
        if let Some(proxy) = update.proxy {
            self.proxy = proxy;
        }
        if let Some(debug) = update.debug_mode {
            self.debug_mode = debug;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base_url '{}': {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid base_url scheme: {}. Must be 'http' or 'https'",
                url.scheme()
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        if !(10..=1000).contains(&self.progress_tick_ms) {
            return Err("progress_tick_ms must be between 10 and 1000".to_string());
        }

        if let Some(proxy) = &self.proxy {
            proxy.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
