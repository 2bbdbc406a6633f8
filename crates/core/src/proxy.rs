//! Proxy Configuration Types
//!
//! Outbound proxy settings for the analysis service client. The HTTP client
//! factory that consumes these lives in `trustscope-client`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Proxy protocol type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    Http,
    Https,
    Socks5,
}

impl ProxyProtocol {
    /// URL scheme for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "http" => Some(ProxyProtocol::Http),
            "https" => Some(ProxyProtocol::Https),
            "socks5" | "socks5h" => Some(ProxyProtocol::Socks5),
            _ => None,
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub protocol: ProxyProtocol,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Never written back to the config file.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parse `scheme://host:port`. Credentials in the URL are not accepted;
    /// set `username`/`password` separately.
    pub fn parse(url: &str) -> CoreResult<Self> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| CoreError::config(format!("Proxy URL has no scheme: {}", url)))?;
        let protocol = ProxyProtocol::from_scheme(scheme)
            .ok_or_else(|| CoreError::config(format!("Unsupported proxy scheme: {}", scheme)))?;
        let rest = rest.trim_end_matches('/');
        if rest.contains('@') {
            return Err(CoreError::config("Proxy URL must not embed credentials"));
        }
        let (host, port) = rest
            .rsplit_once(':')
            .ok_or_else(|| CoreError::config(format!("Proxy URL has no port: {}", url)))?;
        let port: u16 = port
            .parse()
            .map_err(|_| CoreError::config(format!("Invalid proxy port: {}", port)))?;

        let cfg = Self {
            protocol,
            host: host.to_string(),
            port,
            username: None,
            password: None,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Proxy URL without credentials.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.host.trim().is_empty() {
            return Err(CoreError::config("Proxy host is empty"));
        }
        if self.port == 0 {
            return Err(CoreError::config("Proxy port must be non-zero"));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(CoreError::config("Proxy password set without a username"));
        }
        Ok(())
    }
}
