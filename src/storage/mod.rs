//! Storage Layer
//!
//! JSON configuration file. Analysis results are never persisted.

pub mod config;

pub use config::*;
