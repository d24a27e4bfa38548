//! CSV reading for the reference table.

use std::path::Path;

use super::ReferenceEntry;
use crate::errors::{InferenceError, InferenceResult};

pub(super) fn read_reference_csv(path: &Path) -> InferenceResult<Vec<ReferenceEntry>> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| InferenceError::ReferenceData {
            path: display.clone(),
            reason: e.to_string(),
        })?;

    let headers = reader.headers()?.clone();
    let code_col = column(&headers, "code").ok_or_else(|| InferenceError::ReferenceData {
        path: display.clone(),
        reason: "missing 'code' column".to_string(),
    })?;
    let desc_col = column(&headers, "description").ok_or_else(|| InferenceError::ReferenceData {
        path: display.clone(),
        reason: "missing 'description' column".to_string(),
    })?;

    let mut entries = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| InferenceError::ReferenceData {
            path: display.clone(),
            reason: format!("CSV parse error at row {}: {e}", i + 1),
        })?;
        entries.push(ReferenceEntry {
            code: record.get(code_col).unwrap_or_default().to_string(),
            description: record.get(desc_col).unwrap_or_default().to_string(),
        });
    }

    Ok(entries)
}

pub(crate) fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
