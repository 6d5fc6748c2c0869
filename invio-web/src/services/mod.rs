//! Clients for the external webhook services
//!
//! Every client carries an explicit 30-second timeout; failures are
//! terminal for the current attempt and retried only by the user. No
//! automatic retry or backoff anywhere.

mod cleanup;
mod extraction;
mod ingestion;

pub use cleanup::{CleanupClient, CleanupError};
pub use extraction::{ExtractionClient, ExtractionError};
pub use ingestion::{IngestionClient, IngestionError, SubmissionRecord};

use std::time::Duration;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const USER_AGENT: &str = concat!("invio-web/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client construction (timeout + user agent).
pub(crate) fn build_http_client() -> invio_common::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| invio_common::Error::Internal(format!("HTTP client setup failed: {}", e)))
}
