//! PDF Export
//!
//! Turns the stored result for a tool into a PDF via the tool's export
//! endpoint. Reads the result store only; never touches sessions.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use trustscope_client::{AdapterRegistry, AnalysisBackend, ClientError};
use trustscope_core::ToolKind;

use crate::services::result_store::ResultStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

pub struct ExportService {
    backend: Arc<dyn AnalysisBackend>,
    adapters: AdapterRegistry,
    store: ResultStore,
}

impl ExportService {
    pub fn new(backend: Arc<dyn AnalysisBackend>, adapters: AdapterRegistry, store: ResultStore) -> Self {
        Self {
            backend,
            adapters,
            store,
        }
    }

    /// Request the PDF for the last completed result of `tool`.
    pub async fn generate_pdf(&self, tool: ToolKind) -> AppResult<Vec<u8>> {
        let payload = self.store.get(tool).ok_or_else(|| ClientError::NoResult {
            tool: tool.as_str().to_string(),
        })?;
        let adapter = self
            .adapters
            .get(tool)
            .ok_or_else(|| AppError::not_found(format!("adapter for {}", tool)))?;

        let timestamp = Utc::now().to_rfc3339();
        let body = adapter.pdf_request(&payload, &timestamp);

        tracing::debug!(tool = %tool, endpoint = adapter.pdf_endpoint(), "requesting PDF export");
        let bytes = self.backend.download(adapter.pdf_endpoint(), body).await?;
        tracing::info!(tool = %tool, bytes = bytes.len(), "PDF export received");
        Ok(bytes)
    }

    /// Generate the PDF and write it to `path`. Returns the byte count.
    pub async fn export_to_file(&self, tool: ToolKind, path: &Path) -> AppResult<usize> {
        let bytes = self.generate_pdf(tool).await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        std::fs::write(path, &bytes)?;
        Ok(bytes.len())
    }
}
