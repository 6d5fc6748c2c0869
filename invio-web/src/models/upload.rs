//! Uploaded file snapshot and extraction response parsing

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::invoice::InvoiceFields;

/// Sentinel code the extraction service puts in the response body when
/// the uploaded file is not a supported type.
pub const INVALID_FILE_TYPE_CODE: i64 = 199;

/// The uploaded file captured for the duration of one attempt.
///
/// Read-only after creation; discarded when the attempt completes or is
/// cancelled. The content is base64-encoded so the whole struct stays a
/// portable JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    /// Base64-encoded file content
    pub data: String,
}

/// Parsed extraction response.
///
/// The service answers with one of three shapes: an array of field
/// mappings (the first one counts), a single field mapping, or an
/// error-code object.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionReply {
    Fields(InvoiceFields),
    ErrorCode { code: i64, message: Option<String> },
}

impl ExtractionReply {
    /// Classify a raw response body. Anything outside the three
    /// documented shapes is rejected with a description of what arrived.
    pub fn parse(raw: &Value) -> Result<Self, String> {
        match raw {
            Value::Object(map) => {
                if let Some(code) = map.get("code").and_then(Value::as_i64) {
                    let message = map
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    return Ok(Self::ErrorCode { code, message });
                }
                Ok(Self::Fields(InvoiceFields::from_mapping(map)))
            }
            Value::Array(items) => match items.first() {
                None => Ok(Self::Fields(InvoiceFields::default())),
                Some(Value::Object(map)) => Ok(Self::Fields(InvoiceFields::from_mapping(map))),
                Some(other) => Err(format!(
                    "array of {} instead of field mappings",
                    json_kind(other)
                )),
            },
            other => Err(format!("{} instead of object or array", json_kind(other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
