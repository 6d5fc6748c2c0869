//! Upload attempt state machine
//!
//! One attempt moves through three stages derived from which transient
//! keys exist: Empty → Uploaded (file + extraction response) → Reviewed
//! (edited snapshot written). Each step checks its own precondition and
//! hands the next step an independent copy of the data; the whole scope
//! is cleared on success or cancellation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::invoice::InvoiceFields;
use crate::models::upload::{ExtractionReply, UploadedFile};
use crate::storage::TransientStore;

/// Transient keys of one upload attempt
pub const KEY_UPLOADED_FILE: &str = "uploaded_file";
pub const KEY_EXTRACTION_RESPONSE: &str = "extraction_response";
pub const KEY_EDITED_FIELDS: &str = "edited_fields";

/// Workflow stage, derived from transient-key presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStage {
    /// Nothing in flight; only the upload screen is legal
    Empty,
    /// File and extraction response captured; review is reachable
    Uploaded,
    /// Edited snapshot written; confirmation is reachable
    Reviewed,
}

/// Step precondition failures. Every one of these sends the user back to
/// the upload screen; none of them is recoverable in place.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No upload in progress ({0} missing). Start a new upload.")]
    Missing(&'static str),

    #[error("Stored upload data is unusable: {0}. Start a new upload.")]
    Malformed(String),
}

/// Typed access to the transient scope of one upload attempt.
#[derive(Debug, Clone)]
pub struct WorkflowSession {
    store: TransientStore,
}

impl WorkflowSession {
    pub fn new(store: TransientStore) -> Self {
        Self { store }
    }

    /// Current stage. Malformed entries read as absent, so a corrupted
    /// attempt degrades to `Empty` and forces a restart.
    pub async fn stage(&self) -> SessionStage {
        let file = self.store.get::<UploadedFile>(KEY_UPLOADED_FILE).await;
        if file.is_none() {
            return SessionStage::Empty;
        }
        if self
            .store
            .get::<InvoiceFields>(KEY_EDITED_FIELDS)
            .await
            .is_some()
        {
            return SessionStage::Reviewed;
        }
        if self.store.get::<Value>(KEY_EXTRACTION_RESPONSE).await.is_some() {
            return SessionStage::Uploaded;
        }
        SessionStage::Empty
    }

    /// Begin a fresh attempt: supersede whatever was in flight and write
    /// the uploaded file and the raw extraction response together.
    pub async fn begin(
        &self,
        file: &UploadedFile,
        raw_response: &Value,
    ) -> invio_common::Result<()> {
        self.store.clear().await;
        self.store.put(KEY_UPLOADED_FILE, file).await?;
        self.store.put(KEY_EXTRACTION_RESPONSE, raw_response).await?;
        info!(file = %file.name, size = file.size, "Upload attempt started");
        Ok(())
    }

    /// Data for the review screen: the file plus the editable snapshot.
    /// After "back to edit" the edited snapshot wins over the raw
    /// extraction response, so edits survive the round trip.
    pub async fn review(&self) -> Result<(UploadedFile, InvoiceFields), SessionError> {
        let file = self
            .store
            .get::<UploadedFile>(KEY_UPLOADED_FILE)
            .await
            .ok_or(SessionError::Missing("uploaded file"))?;

        if let Some(edited) = self.store.get::<InvoiceFields>(KEY_EDITED_FIELDS).await {
            return Ok((file, edited));
        }

        let raw = self
            .store
            .get::<Value>(KEY_EXTRACTION_RESPONSE)
            .await
            .ok_or(SessionError::Missing("extraction response"))?;
        match ExtractionReply::parse(&raw) {
            Ok(ExtractionReply::Fields(fields)) => Ok((file, fields)),
            Ok(ExtractionReply::ErrorCode { code, .. }) => Err(SessionError::Malformed(format!(
                "extraction error code {} stored in session",
                code
            ))),
            Err(shape) => Err(SessionError::Malformed(shape)),
        }
    }

    /// Write the full edited snapshot. Requires the attempt to still hold
    /// the uploaded file and the extraction response.
    pub async fn save_edits(&self, fields: &InvoiceFields) -> Result<(), SessionError> {
        if !self.store.contains(KEY_UPLOADED_FILE).await {
            return Err(SessionError::Missing("uploaded file"));
        }
        if !self.store.contains(KEY_EXTRACTION_RESPONSE).await {
            return Err(SessionError::Missing("extraction response"));
        }
        self.store
            .put(KEY_EDITED_FIELDS, fields)
            .await
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        debug!("Edited field snapshot saved");
        Ok(())
    }

    /// Data for the confirmation screen: file plus the edited snapshot.
    pub async fn confirm(&self) -> Result<(UploadedFile, InvoiceFields), SessionError> {
        let file = self
            .store
            .get::<UploadedFile>(KEY_UPLOADED_FILE)
            .await
            .ok_or(SessionError::Missing("uploaded file"))?;
        let fields = self
            .store
            .get::<InvoiceFields>(KEY_EDITED_FIELDS)
            .await
            .ok_or(SessionError::Missing("edited fields"))?;
        Ok((file, fields))
    }

    /// Tracking link for the cleanup webhook, wherever the attempt
    /// currently carries it.
    pub async fn tracking_link(&self) -> Option<String> {
        if let Some(fields) = self.store.get::<InvoiceFields>(KEY_EDITED_FIELDS).await {
            if let Some(link) = fields.tracking_link() {
                return Some(link);
            }
        }
        let raw = self.store.get::<Value>(KEY_EXTRACTION_RESPONSE).await?;
        match ExtractionReply::parse(&raw) {
            Ok(ExtractionReply::Fields(fields)) => fields.tracking_link(),
            _ => None,
        }
    }

    /// Drop the whole attempt (successful completion and cancellation
    /// both end here).
    pub async fn clear(&self) {
        self.store.clear().await;
    }
}
