//! Integration Tests Module
//!
//! End-to-end tests of the analysis session lifecycle against a scripted
//! backend: single-flight submission, progress ordering, failure
//! classification, cancellation, export, and configuration.

// Scripted backend and helpers shared by the tests
mod support;

// Request gateway lifecycle tests
mod gateway_test;

// Simulated progress and event ordering tests
mod progress_test;

// PDF export and share tests
mod export_test;
