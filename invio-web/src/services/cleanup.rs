//! Cleanup webhook client
//!
//! Best-effort notice that an attempt was cancelled. The payload is one
//! JSON object carrying the tracking link the extraction service
//! injected. Failures are logged and never block the cancellation.

use thiserror::Error;
use tracing::info;

/// Cleanup notification errors (only ever logged)
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Cleanup service returned status {0}")]
    Status(u16),
}

/// Cleanup webhook client
#[derive(Debug, Clone)]
pub struct CleanupClient {
    http: reqwest::Client,
    url: String,
}

impl CleanupClient {
    pub fn new(url: String) -> invio_common::Result<Self> {
        Ok(Self {
            http: super::build_http_client()?,
            url,
        })
    }

    /// Fire the cancellation notice for one tracking link.
    pub async fn notify_cancel(&self, resume_url: &str) -> Result<(), CleanupError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "resumeUrl": resume_url }))
            .send()
            .await
            .map_err(|e| CleanupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CleanupError::Status(status.as_u16()));
        }

        info!("Cleanup service notified of cancelled attempt");
        Ok(())
    }
}
