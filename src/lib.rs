//! TrustScope - Analysis Session Orchestrator
//!
//! Submits content to the TrustScope analysis service and manages each
//! submission as a session. It includes:
//! - Request gateway with a single in-flight session per tool
//! - Simulated staged progress, independent of backend latency
//! - Result store consumed by PDF export and sharing
//! - Configuration storage and the command-line front end

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::session::AnalysisSession;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::{ExportService, RequestGateway, ResultStore, SubmitResult};
pub use state::{AppState, Services};
pub use utils::error::{AppError, AppResult};
