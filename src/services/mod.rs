//! Services
//!
//! Session orchestration and its collaborators:
//! - `gateway` - single-flight submit, cancel, and session queries
//! - `progress` - simulated staged progress
//! - `result_store` - last successful payload per tool
//! - `export` / `share` - consumers of the result store

pub mod export;
pub mod gateway;
pub mod progress;
pub mod result_store;
pub mod share;

pub use export::ExportService;
pub use gateway::{RequestGateway, SubmitResult};
pub use progress::{ProgressSimulator, ProgressSnapshot, ProgressTimeline, SimulatorPhase, HOLD_PERCENT};
pub use result_store::ResultStore;
pub use share::share_text;
