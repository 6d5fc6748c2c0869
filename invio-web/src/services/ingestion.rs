//! Ingestion webhook client
//!
//! The confirmed record is POSTed as a JSON array containing exactly one
//! object: the final field set (including quarantined tracking keys)
//! plus file metadata. Any 2xx status counts as accepted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::InvoiceFields;

/// Ingestion client errors
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Ingestion service returned status {0}")]
    Status(u16),
}

/// The single object inside the submission array.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(flatten)]
    pub fields: InvoiceFields,
    pub file_name: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Ingestion webhook client
#[derive(Debug, Clone)]
pub struct IngestionClient {
    http: reqwest::Client,
    url: String,
}

impl IngestionClient {
    pub fn new(url: String) -> invio_common::Result<Self> {
        Ok(Self {
            http: super::build_http_client()?,
            url,
        })
    }

    /// Submit the confirmed record. No retry; a failure leaves the
    /// attempt intact for the user to resubmit.
    pub async fn submit(&self, record: &SubmissionRecord) -> Result<(), IngestionError> {
        let response = self
            .http
            .post(&self.url)
            .json(std::slice::from_ref(record))
            .send()
            .await
            .map_err(|e| IngestionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::Status(status.as_u16()));
        }

        info!(
            invoice_number = %record.fields.invoice_number,
            file = %record.file_name,
            "Record accepted by ingestion service"
        );
        Ok(())
    }
}
