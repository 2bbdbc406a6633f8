//! Application State
//!
//! Holds the configuration service and the services built from it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use trustscope_client::{build_http_client, AccountClient, AdapterRegistry, AnalysisBackend, HttpBackend};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::{ExportService, RequestGateway, ResultStore};
use crate::storage::ConfigService;
use crate::utils::error::{AppError, AppResult};

/// Services sharing one backend and one result store.
#[derive(Clone)]
pub struct Services {
    pub gateway: Arc<RequestGateway>,
    pub export: Arc<ExportService>,
    pub store: ResultStore,
    /// Only present when talking to the real service.
    pub account: Option<AccountClient>,
}

impl Services {
    /// Build against the HTTP service described by `config`.
    pub fn from_config(config: &AppConfig, adapters: AdapterRegistry) -> AppResult<Self> {
        let client = build_http_client(
            config.proxy.as_ref(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let http = HttpBackend::new(&config.base_url, client)?;
        let account = AccountClient::new(http.clone());
        let mut services = Self::with_backend(
            Arc::new(http),
            adapters,
            Duration::from_millis(config.progress_tick_ms),
        );
        services.account = Some(account);
        Ok(services)
    }

    /// Build against any backend.
    pub fn with_backend(
        backend: Arc<dyn AnalysisBackend>,
        adapters: AdapterRegistry,
        tick: Duration,
    ) -> Self {
        let store = ResultStore::new();
        let gateway = RequestGateway::new(backend.clone(), adapters.clone(), store.clone(), tick);
        let export = ExportService::new(backend, adapters, store.clone());
        Self {
            gateway: Arc::new(gateway),
            export: Arc::new(export),
            store,
            account: None,
        }
    }
}

/// Application state
pub struct AppState {
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// Gateway, export and account clients
    services: Arc<RwLock<Option<Services>>>,
    /// Adapters the services are built with
    adapters: Arc<RwLock<AdapterRegistry>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            services: Arc::new(RwLock::new(None)),
            adapters: Arc::new(RwLock::new(AdapterRegistry::with_defaults())),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Initialize from an already opened config service
    pub async fn initialize_with(&self, config: ConfigService, adapters: AdapterRegistry) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        let services = Services::from_config(config.get_config(), adapters.clone())?;
        *self.config.write().await = Some(config);
        *self.services.write().await = Some(services);
        *self.adapters.write().await = adapters;

        *initialized = true;
        tracing::debug!("application state initialized");
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Check if config is healthy
    pub fn is_config_healthy(&self) -> bool {
        if let Ok(guard) = self.config.try_read() {
            if let Some(ref config) = *guard {
                return config.is_healthy();
            }
        }
        false
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => Ok(config.get_config().clone()),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Update the configuration and rebuild the services from it.
    ///
    /// Sessions in flight on the previous services finish there.
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let updated = {
            let mut guard = self.config.write().await;
            match &mut *guard {
                Some(config) => config.update_config(update)?,
                None => return Err(AppError::config("Config service not initialized")),
            }
        };

        let adapters = self.adapters.read().await.clone();
        let services = Services::from_config(&updated, adapters)?;
        *self.services.write().await = Some(services);
        Ok(updated)
    }

    /// Handles to the current services
    pub async fn services(&self) -> AppResult<Services> {
        let guard = self.services.read().await;
        guard
            .clone()
            .ok_or_else(|| AppError::internal("Services not initialized"))
    }

    /// Get mutable config service access
    pub async fn with_config_mut<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut ConfigService) -> AppResult<T>,
    {
        let mut guard = self.config.write().await;
        match &mut *guard {
            Some(config) => f(config),
            None => Err(AppError::config("Config service not initialized")),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("initialized", &self.initialized)
            .finish()
    }
}
