//! Data model for the intake workflow

mod invoice;
mod session;
mod upload;

pub use invoice::{humanize_key, DisplayField, InvoiceFields, InvoicePatch, SavedInvoice};
pub use session::{
    SessionError, SessionStage, WorkflowSession, KEY_EDITED_FIELDS, KEY_EXTRACTION_RESPONSE,
    KEY_UPLOADED_FILE,
};
pub use upload::{ExtractionReply, UploadedFile, INVALID_FILE_TYPE_CODE};
