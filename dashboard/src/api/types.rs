//! REST API response types.
//!
//! Table rows keep their own serialized column names; only the envelope is camelCase.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dataset::SourceInfo;

/// Envelope for every summary-table endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse<T> {
    /// Unique request identifier
    pub request_id: String,

    /// Table name, e.g. `survival`
    pub table: String,

    /// When the table was computed
    pub generated_at: DateTime<Utc>,

    pub row_count: usize,

    pub rows: Vec<T>,
}

impl<T: Serialize> TableResponse<T> {
    pub fn new(table: &str, rows: Vec<T>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            table: table.to_string(),
            generated_at: Utc::now(),
            row_count: rows.len(),
            rows,
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub passengers: usize,
    pub source: SourceInfo,
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "requestId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}
