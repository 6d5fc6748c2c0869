//! Saved-invoice API handlers: search, inspect, update, download

use axum::{
    extract::{Path, Query, State},
    http::header,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{DisplayField, InvoicePatch, SavedInvoice};
use crate::AppState;

/// GET /api/invoices query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// One row of the search result table
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub vendor_name: String,
    pub total_amount: String,
    pub file_name: String,
}

impl From<&SavedInvoice> for InvoiceSummary {
    fn from(invoice: &SavedInvoice) -> Self {
        Self {
            id: invoice.id.clone(),
            invoice_number: invoice.fields.invoice_number.clone(),
            invoice_date: invoice.fields.invoice_date.clone(),
            vendor_name: invoice.fields.vendor_name.clone(),
            total_amount: invoice.fields.total_amount.clone(),
            file_name: invoice.file_name.clone(),
        }
    }
}

/// Full record view for the inspect and download screens
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    pub fields: Vec<DisplayField>,
}

impl From<&SavedInvoice> for InvoiceDetail {
    fn from(invoice: &SavedInvoice) -> Self {
        Self {
            id: invoice.id.clone(),
            file_name: invoice.file_name.clone(),
            file_size: invoice.file_size,
            upload_date: invoice.upload_date,
            fields: invoice.fields.display_fields(),
        }
    }
}

/// GET /api/invoices?q=
///
/// Case-insensitive substring search over invoice number, vendor name
/// and description. Linear scan; the durable list is small by design.
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<InvoiceSummary>>> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    let records = state.records.list().await?;
    let summaries = records
        .iter()
        .filter(|r| r.matches(query))
        .map(InvoiceSummary::from)
        .collect();
    Ok(Json(summaries))
}

/// GET /api/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InvoiceDetail>> {
    let invoice = state
        .records
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice not found: {}", id)))?;
    Ok(Json(InvoiceDetail::from(&invoice)))
}

/// PUT /api/invoices/{id}
///
/// Patch the stored record in place (non-destructive partial update).
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<InvoicePatch>,
) -> ApiResult<Json<InvoiceDetail>> {
    let updated = state.records.update(&id, &patch).await?;
    Ok(Json(InvoiceDetail::from(&updated)))
}

/// GET /api/invoices/{id}/download
///
/// Fixed projection of one record as a JSON attachment, named after the
/// invoice number. Touches nothing but the durable list.
pub async fn download_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let invoice = state
        .records
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice not found: {}", id)))?;

    let body = serde_json::to_string_pretty(&invoice.download_projection())
        .map_err(|e| ApiError::Common(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_filename(&invoice)),
            ),
        ],
        body,
    ))
}

/// Attachment name derived from the invoice number, reduced to filesystem
/// friendly characters; the id is the fallback for blank numbers.
fn download_filename(invoice: &SavedInvoice) -> String {
    let base: String = invoice
        .fields
        .invoice_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let base = base.trim_matches('-');
    if base.is_empty() {
        format!("{}.json", invoice.id)
    } else {
        format!("{}.json", base)
    }
}

/// Build record routes
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/api/invoices", get(list_invoices))
        .route("/api/invoices/:id", get(get_invoice).put(update_invoice))
        .route("/api/invoices/:id/download", get(download_invoice))
}
