//! Data Models
//!
//! Session record and application settings.

pub mod session;
pub mod settings;

pub use session::AnalysisSession;
pub use settings::{AppConfig, SettingsUpdate};
