//! TrustScope Core
//!
//! Domain types and pure logic for the analysis session orchestrator. This
//! crate performs no I/O and has no async runtime dependency.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `tool` - Tool kinds, tiers, inputs, transport-agnostic request bodies
//! - `stages` - Pre-authored progress stage sequences
//! - `outcome` - `Outcome`, `FailureKind`, raw reply and raw failure shapes
//! - `normalizer` - Reply acceptance rule
//! - `classifier` - Failure categorization
//! - `events` - Session status and observer events
//! - `proxy` - Proxy configuration shared with the client crate

pub mod classifier;
pub mod error;
pub mod events;
pub mod normalizer;
pub mod outcome;
pub mod proxy;
pub mod stages;
pub mod tool;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Domain ─────────────────────────────────────────────────────────────
pub use outcome::{FailureKind, Outcome, Payload, RawFailure, RawReply};
pub use stages::{default_stages, StageSpec};
pub use tool::{AnalysisInput, FileInput, InputDescriptor, MultipartPart, RequestBody, Tier, ToolKind};

// ── Normalization & Classification ─────────────────────────────────────
pub use classifier::{classify, Classified};
pub use normalizer::{accepts, normalize, normalize_outcome, normalize_with, AcceptRule};

// ── Events ─────────────────────────────────────────────────────────────
pub use events::{ProgressResolution, SessionEvent, SessionStatus};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};
