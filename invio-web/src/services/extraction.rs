//! Extraction webhook client
//!
//! Sends the uploaded file as a multipart body (file + filename +
//! uploadedAt) and parses the structured reply. The body is parsed
//! before the HTTP status is checked so the in-band sentinel code wins
//! over a non-2xx status, matching the service's documented behavior.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{ExtractionReply, InvoiceFields, INVALID_FILE_TYPE_CODE};

/// Extraction client errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Extraction service returned status {0}")]
    Status(u16),

    #[error("Invalid file type. Please upload a PDF only.")]
    InvalidFileType,

    #[error("Unexpected extraction response: {0}")]
    UnexpectedShape(String),
}

/// Extraction webhook client
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    url: String,
}

impl ExtractionClient {
    pub fn new(url: String) -> invio_common::Result<Self> {
        Ok(Self {
            http: super::build_http_client()?,
            url,
        })
    }

    /// Upload one file for extraction.
    ///
    /// Returns the raw response body (stored verbatim in the transient
    /// scope) together with the parsed field set.
    pub async fn extract(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        uploaded_at: DateTime<Utc>,
    ) -> Result<(Value, InvoiceFields), ExtractionError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ExtractionError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("filename", file_name.to_string())
            .text("uploadedAt", uploaded_at.to_rfc3339());

        info!(file = file_name, "Sending file to extraction service");

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;
        let status = response.status();

        let raw: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::UnexpectedShape(e.to_string()))?;

        let reply = ExtractionReply::parse(&raw).map_err(ExtractionError::UnexpectedShape)?;

        // Sentinel code wins over the HTTP status.
        if let ExtractionReply::ErrorCode { code, message } = &reply {
            if *code == INVALID_FILE_TYPE_CODE {
                warn!(file = file_name, "Extraction rejected the file type");
                return Err(ExtractionError::InvalidFileType);
            }
            if status.is_success() {
                return Err(ExtractionError::UnexpectedShape(format!(
                    "error code {}{}",
                    code,
                    message
                        .as_deref()
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                )));
            }
        }

        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }

        match reply {
            ExtractionReply::Fields(fields) => {
                info!(
                    file = file_name,
                    blank = fields.is_blank(),
                    quarantined = fields.extra.len(),
                    "Extraction response parsed"
                );
                Ok((raw, fields))
            }
            // Non-sentinel error codes with a 2xx status were handled above.
            ExtractionReply::ErrorCode { code, .. } => Err(ExtractionError::UnexpectedShape(
                format!("error code {}", code),
            )),
        }
    }
}
