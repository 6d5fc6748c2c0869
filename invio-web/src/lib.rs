//! invio-web library interface
//!
//! Exposes the application state and router assembly for the binary and
//! for integration tests.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::WorkflowSession;
use crate::services::{CleanupClient, ExtractionClient, IngestionClient};
use crate::storage::{RecordStore, TransientStore};
use invio_common::config::ServiceConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// Transient scope of the in-flight upload attempt
    pub transient: TransientStore,
    /// Durable saved-invoice list
    pub records: RecordStore,
    /// Extraction webhook client
    pub extraction: ExtractionClient,
    /// Ingestion webhook client
    pub ingestion: IngestionClient,
    /// Cleanup webhook client
    pub cleanup: CleanupClient,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServiceConfig, records: RecordStore) -> invio_common::Result<Self> {
        let extraction = ExtractionClient::new(config.extraction_url.clone())?;
        let ingestion = IngestionClient::new(config.ingestion_url.clone())?;
        let cleanup = CleanupClient::new(config.cleanup_url.clone())?;

        Ok(Self {
            config: Arc::new(config),
            transient: TransientStore::new(),
            records,
            extraction,
            ingestion,
            cleanup,
            startup_time: Utc::now(),
        })
    }

    /// Typed view over this state's transient scope.
    pub fn session(&self) -> WorkflowSession {
        WorkflowSession::new(self.transient.clone())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    // Multipart overhead on top of the configured file size cap.
    let body_limit = state.config.max_upload_bytes as usize + 64 * 1024;

    Router::new()
        // UI routes (HTML screens)
        .merge(api::ui_routes())
        // API routes
        .merge(api::workflow_routes())
        .merge(api::record_routes())
        .merge(api::health_routes())
        .fallback(api::ui::not_found_page)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
