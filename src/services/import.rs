//! Bulk product import from spreadsheet rows.
//!
//! Rows arrive already parsed by an external spreadsheet reader, either as
//! one JSON array of objects or as JSONL (one object per line). Preview
//! reports the first row's headers, a three-row sample and the total.
//! Import stamps every valid row with creation timestamps and writes them
//! all in one batch; malformed rows are skipped and counted.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::now_rfc3339;
use super::products::{ProductRecord, product_path};
use crate::docstore::{self, DocError, DocumentStore};
use crate::frame::ErrorCode;

pub const PREVIEW_SAMPLE_ROWS: usize = 3;

type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("no rows to import")]
    Empty,
    #[error("invalid JSON array: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] DocError),
}

impl ErrorCode for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_IMPORT_EMPTY",
            Self::InvalidJson(_) => "E_IMPORT_INVALID_JSON",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.retryable())
    }
}

/// Rows parsed from an upload body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<Row>,
    /// Lines or array entries that were not JSON objects.
    pub malformed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPreview {
    pub headers: Vec<String>,
    pub sample: Vec<Row>,
    pub total: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a JSON array of objects, or JSONL when the body is not an array.
///
/// # Errors
///
/// Returns `InvalidJson` if the body starts like an array but does not
/// parse as one.
pub fn parse_rows(body: &str) -> Result<ParsedRows, ImportError> {
    let trimmed = body.trim_start();
    let mut parsed = ParsedRows::default();

    if trimmed.starts_with('[') {
        let values = serde_json::from_str::<Vec<serde_json::Value>>(trimmed).map_err(ImportError::InvalidJson)?;
        for value in values {
            match value {
                serde_json::Value::Object(row) => parsed.rows.push(row),
                _ => parsed.malformed += 1,
            }
        }
        return Ok(parsed);
    }

    for raw_line in trimmed.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(row)) => parsed.rows.push(row),
            _ => parsed.malformed += 1,
        }
    }
    Ok(parsed)
}

/// Summarize parsed rows for confirmation before import.
///
/// # Errors
///
/// Returns `Empty` if there are no rows.
pub fn preview(parsed: &ParsedRows) -> Result<ImportPreview, ImportError> {
    let first = parsed.rows.first().ok_or(ImportError::Empty)?;
    Ok(ImportPreview {
        headers: first.keys().cloned().collect(),
        sample: parsed.rows.iter().take(PREVIEW_SAMPLE_ROWS).cloned().collect(),
        total: parsed.rows.len(),
        malformed: parsed.malformed,
    })
}

/// Write every valid row as a new product in one batch.
///
/// # Errors
///
/// Returns `Empty` if no rows exist, or the store error if the batch
/// fails; a failed batch writes nothing.
pub async fn import(docs: &dyn DocumentStore, parsed: ParsedRows) -> Result<ImportReport, ImportError> {
    if parsed.rows.is_empty() {
        return Err(ImportError::Empty);
    }

    let now = now_rfc3339();
    let mut skipped = parsed.malformed;
    let mut writes = Vec::with_capacity(parsed.rows.len());

    for (index, mut row) in parsed.rows.into_iter().enumerate() {
        row.remove("id");
        let id = Uuid::new_v4().to_string();
        let path = product_path(&id);

        let mut record = match docstore::decode::<ProductRecord>(&path, serde_json::Value::Object(row)) {
            Ok(record) => record,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed import row");
                skipped += 1;
                continue;
            }
        };
        if let Err(e) = record.validate() {
            warn!(index, error = %e, "skipping invalid import row");
            skipped += 1;
            continue;
        }

        record.created_at.clone_from(&now);
        record.updated_at.clone_from(&now);
        writes.push((path.clone(), docstore::encode(&path, &record)?));
    }

    let imported = writes.len();
    if imported > 0 {
        docs.set_batch(writes).await?;
    }
    info!(imported, skipped, "product import finished");
    Ok(ImportReport { imported, skipped })
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
