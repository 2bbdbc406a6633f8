//! HTTP Client Factory
//!
//! Builds the `reqwest::Client` shared by all endpoint clients, with optional
//! proxy and a per-request timeout.

use std::time::Duration;

use trustscope_core::proxy::ProxyConfig;

use crate::error::{ClientError, ClientResult};

/// Build a `reqwest::Client`.
///
/// - `Some(proxy)` -> route every request through the proxy
/// - `None` -> no proxy, ignoring proxy environment variables
pub fn build_http_client(
    proxy: Option<&ProxyConfig>,
    timeout: Duration,
) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("trustscope/", env!("CARGO_PKG_VERSION")));

    match proxy {
        Some(cfg) => {
            cfg.validate().map_err(|e| ClientError::Config {
                message: e.to_string(),
            })?;
            let mut p = reqwest::Proxy::all(cfg.url()).map_err(|e| ClientError::Config {
                message: format!("Invalid proxy: {}", e),
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }

    builder.build().map_err(|e| ClientError::Config {
        message: format!("Failed to build HTTP client: {}", e),
    })
}
