//! Upload workflow API handlers
//!
//! One handler per step transition: upload (multipart in, extraction
//! out), review load/save, confirmation load/submit/cancel. Every
//! precondition failure maps to a session error the screens turn into a
//! redirect back to the upload step.

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{DisplayField, InvoicePatch, SavedInvoice, SessionStage, UploadedFile};
use crate::services::SubmissionRecord;
use crate::AppState;

/// POST /api/upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub stage: SessionStage,
    pub fields_extracted: bool,
    pub next: String,
}

/// File metadata shown on the review and confirmation screens
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    pub name: String,
    pub size: u64,
}

/// GET /api/session/review and /api/session/confirm response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepContextResponse {
    pub file: SessionFile,
    pub fields: Vec<DisplayField>,
}

/// Response for step transitions that only navigate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextResponse {
    pub next: String,
}

/// POST /api/session/submit response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub id: String,
    pub next: String,
}

struct ReceivedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> ApiResult<ReceivedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.pdf").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
            .to_vec();
        return Ok(ReceivedFile {
            name,
            content_type,
            bytes,
        });
    }
    Err(ApiError::BadRequest(
        "No file provided. Please select a file to upload.".to_string(),
    ))
}

/// Declared-type and size checks. The extraction service remains the
/// authority on whether the content really is a supported file.
fn validate_upload(file: &ReceivedFile, max_bytes: u64) -> ApiResult<()> {
    if file.bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }
    if file.bytes.len() as u64 > max_bytes {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {} MB limit",
            max_bytes / (1024 * 1024)
        )));
    }
    let looks_like_pdf =
        file.content_type == "application/pdf" || file.name.to_lowercase().ends_with(".pdf");
    if !looks_like_pdf {
        return Err(ApiError::BadRequest(
            "Please upload a PDF file".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/upload
///
/// Send the file to the extraction service and, only on success, capture
/// the encoded file and the raw response into the transient scope. On
/// any failure nothing is written and the user stays on the upload step.
pub async fn upload_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let received = read_upload(&mut multipart).await?;
    validate_upload(&received, state.config.max_upload_bytes)?;

    let uploaded_at = Utc::now();
    let (raw, fields) = state
        .extraction
        .extract(
            &received.name,
            &received.content_type,
            received.bytes.clone(),
            uploaded_at,
        )
        .await?;

    let file = UploadedFile {
        name: received.name,
        content_type: received.content_type,
        size: received.bytes.len() as u64,
        data: BASE64.encode(&received.bytes),
    };
    state.session().begin(&file, &raw).await?;

    let fields_extracted = !fields.is_blank();
    if !fields_extracted {
        warn!(file = %file.name, "Extraction returned no invoice data");
    }

    Ok(Json(UploadResponse {
        stage: SessionStage::Uploaded,
        fields_extracted,
        next: "/upload-invoice/review".to_string(),
    }))
}

/// GET /api/session/review
///
/// Editable snapshot for the review screen. Quarantined keys are
/// already filtered out by the display projection.
pub async fn review_context(State(state): State<AppState>) -> ApiResult<Json<StepContextResponse>> {
    let (file, fields) = state.session().review().await?;
    Ok(Json(StepContextResponse {
        file: SessionFile {
            name: file.name,
            size: file.size,
        },
        fields: fields.display_fields(),
    }))
}

/// POST /api/session/review
///
/// Apply the submitted edits as a non-destructive partial update and
/// store the full snapshot for the confirmation step.
pub async fn save_review(
    State(state): State<AppState>,
    Json(patch): Json<InvoicePatch>,
) -> ApiResult<Json<NextResponse>> {
    let session = state.session();
    let (_, mut fields) = session.review().await?;
    patch.apply(&mut fields);
    session.save_edits(&fields).await?;
    Ok(Json(NextResponse {
        next: "/upload-invoice/confirm".to_string(),
    }))
}

/// GET /api/session/confirm
pub async fn confirm_context(
    State(state): State<AppState>,
) -> ApiResult<Json<StepContextResponse>> {
    let (file, fields) = state.session().confirm().await?;
    Ok(Json(StepContextResponse {
        file: SessionFile {
            name: file.name,
            size: file.size,
        },
        fields: fields.display_fields(),
    }))
}

/// POST /api/session/submit
///
/// Final submission: the record goes to the ingestion service first;
/// only when that accepts is it appended to the durable list and the
/// transient scope cleared. A failure leaves the attempt intact for a
/// manual retry.
pub async fn submit_invoice(State(state): State<AppState>) -> ApiResult<Json<SubmitResponse>> {
    let session = state.session();
    let (file, fields) = session.confirm().await?;

    let invoice = SavedInvoice::new(fields.clone(), &file);
    let record = SubmissionRecord {
        fields,
        file_name: file.name.clone(),
        file_size: file.size,
        uploaded_at: invoice.upload_date,
    };

    state.ingestion.submit(&record).await?;

    state.records.append(invoice.clone()).await?;
    session.clear().await;
    info!(invoice_id = %invoice.id, "Upload attempt completed and persisted");

    Ok(Json(SubmitResponse {
        id: invoice.id,
        next: "/search-invoice".to_string(),
    }))
}

/// POST /api/session/cancel
///
/// Unconditional: the cleanup service is notified best-effort (failure
/// is logged, never blocks) and the transient scope is cleared whatever
/// happens.
pub async fn cancel_attempt(State(state): State<AppState>) -> Json<NextResponse> {
    let session = state.session();
    if let Some(link) = session.tracking_link().await {
        let cleanup = state.cleanup.clone();
        tokio::spawn(async move {
            if let Err(e) = cleanup.notify_cancel(&link).await {
                warn!(error = %e, "Cleanup notification failed");
            }
        });
    }
    session.clear().await;
    info!("Upload attempt cancelled");

    Json(NextResponse {
        next: "/upload-invoice".to_string(),
    })
}

/// Build workflow routes
pub fn workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_invoice))
        .route("/api/session/review", get(review_context).post(save_review))
        .route("/api/session/confirm", get(confirm_context))
        .route("/api/session/submit", post(submit_invoice))
        .route("/api/session/cancel", post(cancel_attempt))
}
