//! Invoice field set and saved records
//!
//! `InvoiceFields` is the validated shape the rest of the workflow deals
//! in. The extraction service sends an open key/value mapping; the known
//! keys land in typed fields and everything else is quarantined into
//! `extra`: preserved for transmission downstream, never rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::upload::UploadedFile;

/// Known invoice fields, in display order. Keys are the wire names used
/// by the extraction service and the stored records.
pub const KNOWN_FIELD_KEYS: [&str; 7] = [
    "invoiceNumber",
    "invoiceDate",
    "vendorName",
    "vendorAddress",
    "totalAmount",
    "taxAmount",
    "description",
];

/// Keys injected by the extraction service for its own bookkeeping.
/// Transmitted on submission, filtered from every screen.
const TRACKING_LINK_KEY: &str = "resumeUrl";

/// The confirmed invoice field set.
///
/// All values are strings (the extraction service emits text; edits come
/// from form inputs). Unknown keys from the extraction response are kept
/// in `extra` verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceFields {
    pub invoice_number: String,
    pub invoice_date: String,
    pub vendor_name: String,
    pub vendor_address: String,
    pub total_amount: String,
    pub tax_amount: String,
    pub description: String,
    /// Quarantined keys from the extraction response (tracking ids etc.)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl InvoiceFields {
    /// Build from an open extraction mapping. Known keys are coerced to
    /// strings; everything else is quarantined into `extra`.
    pub fn from_mapping(mapping: &Map<String, Value>) -> Self {
        let mut fields = Self::default();
        for (key, value) in mapping {
            match key.as_str() {
                "invoiceNumber" => fields.invoice_number = coerce_to_string(value),
                "invoiceDate" => fields.invoice_date = coerce_to_string(value),
                "vendorName" => fields.vendor_name = coerce_to_string(value),
                "vendorAddress" => fields.vendor_address = coerce_to_string(value),
                "totalAmount" => fields.total_amount = coerce_to_string(value),
                "taxAmount" => fields.tax_amount = coerce_to_string(value),
                "description" => fields.description = coerce_to_string(value),
                _ => {
                    fields.extra.insert(key.clone(), value.clone());
                }
            }
        }
        fields
    }

    /// The known fields as (key, label, value) rows for the screens.
    /// Quarantined keys are deliberately absent.
    pub fn display_fields(&self) -> Vec<DisplayField> {
        KNOWN_FIELD_KEYS
            .iter()
            .map(|key| DisplayField {
                key: (*key).to_string(),
                label: humanize_key(key),
                value: self.value_of(key).to_string(),
            })
            .collect()
    }

    fn value_of(&self, key: &str) -> &str {
        match key {
            "invoiceNumber" => &self.invoice_number,
            "invoiceDate" => &self.invoice_date,
            "vendorName" => &self.vendor_name,
            "vendorAddress" => &self.vendor_address,
            "totalAmount" => &self.total_amount,
            "taxAmount" => &self.tax_amount,
            "description" => &self.description,
            _ => "",
        }
    }

    /// True when extraction produced nothing usable (the upload screen
    /// warns but still lets the user review).
    pub fn is_blank(&self) -> bool {
        KNOWN_FIELD_KEYS.iter().all(|k| self.value_of(k).is_empty())
    }

    /// Tracking link injected by the extraction service, if any.
    pub fn tracking_link(&self) -> Option<String> {
        self.extra
            .get(TRACKING_LINK_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// One field row prepared for a screen: wire key, display label, value.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayField {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Cosmetic label from a camelCase wire key ("invoiceNumber" → "Invoice
/// Number"). Display only; storage keys are never reformatted.
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

/// Partial update of the known fields. Only present keys replace; the
/// quarantined extras are never touched by a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoicePatch {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_address: Option<String>,
    pub total_amount: Option<String>,
    pub tax_amount: Option<String>,
    pub description: Option<String>,
}

impl InvoicePatch {
    /// Non-destructive partial update: untouched keys keep their value.
    pub fn apply(&self, fields: &mut InvoiceFields) {
        if let Some(v) = &self.invoice_number {
            fields.invoice_number = v.clone();
        }
        if let Some(v) = &self.invoice_date {
            fields.invoice_date = v.clone();
        }
        if let Some(v) = &self.vendor_name {
            fields.vendor_name = v.clone();
        }
        if let Some(v) = &self.vendor_address {
            fields.vendor_address = v.clone();
        }
        if let Some(v) = &self.total_amount {
            fields.total_amount = v.clone();
        }
        if let Some(v) = &self.tax_amount {
            fields.tax_amount = v.clone();
        }
        if let Some(v) = &self.description {
            fields.description = v.clone();
        }
    }
}

/// One saved invoice in the durable list. Append-only; `update` patches
/// fields in place but records are never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInvoice {
    /// Collision-resistant identifier (UUIDv4)
    pub id: String,
    #[serde(flatten)]
    pub fields: InvoiceFields,
    pub file_name: String,
    pub file_size: u64,
    /// Timestamp of the successful save
    pub upload_date: DateTime<Utc>,
}

impl SavedInvoice {
    pub fn new(fields: InvoiceFields, file: &UploadedFile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fields,
            file_name: file.name.clone(),
            file_size: file.size,
            upload_date: Utc::now(),
        }
    }

    /// Case-insensitive substring match against invoice number, vendor
    /// name and description. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.fields.invoice_number.to_lowercase().contains(&query)
            || self.fields.vendor_name.to_lowercase().contains(&query)
            || self.fields.description.to_lowercase().contains(&query)
    }

    /// Fixed projection served by the download screen.
    pub fn download_projection(&self) -> Value {
        serde_json::json!({
            "invoiceNumber": self.fields.invoice_number,
            "invoiceDate": self.fields.invoice_date,
            "vendorName": self.fields.vendor_name,
            "vendorAddress": self.fields.vendor_address,
            "totalAmount": self.fields.total_amount,
            "taxAmount": self.fields.tax_amount,
            "description": self.fields.description,
            "uploadDate": self.upload_date.to_rfc3339(),
        })
    }
}
