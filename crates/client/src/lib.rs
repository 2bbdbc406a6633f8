//! TrustScope Client
//!
//! Talks to the analysis service:
//! - `backend` - the `AnalysisBackend` seam and its `reqwest` implementation
//! - `adapter` / `adapters` - per-tool endpoint, request body, stages, export
//! - `account` - status, usage tracking, contact, beta signup
//! - `http_client` - shared client factory (proxy, timeout)

pub mod account;
pub mod adapter;
pub mod adapters;
pub mod backend;
pub mod error;
pub mod http_client;

pub use account::{AccountClient, ContactRequest, UserStatus};
pub use adapter::{export_results, AdapterRegistry, ToolAdapter};
pub use adapters::{ImageAdapter, NewsAdapter, SpeechAdapter, UnifiedAdapter, YoutubeSpeechAdapter};
pub use backend::{AnalysisBackend, HttpBackend};
pub use error::{ClientError, ClientResult};
pub use http_client::build_http_client;
