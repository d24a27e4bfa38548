//! Policy input: (row index, policy text) pairs from a CSV with a `policy_text` column.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{InferenceError, InferenceResult};

/// One policy to run through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRow {
    /// Zero-based data row position in the source file.
    pub row_index: usize,
    pub policy_text: String,
}

/// Load policies from a CSV file. Empty cells become empty text.
pub fn load_policies(path: impl AsRef<Path>) -> InferenceResult<Vec<PolicyRow>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())?;
    read_policies(reader)
}

/// Load policies from any reader (e.g. stdin or an in-memory buffer).
pub fn load_policies_from_reader<R: std::io::Read>(rdr: R) -> InferenceResult<Vec<PolicyRow>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);
    read_policies(reader)
}

fn read_policies<R: std::io::Read>(mut reader: csv::Reader<R>) -> InferenceResult<Vec<PolicyRow>> {
    let headers = reader.headers()?.clone();
    let text_col = crate::reference::column(&headers, "policy_text")
        .ok_or_else(|| InferenceError::Input("missing 'policy_text' column".to_string()))?;

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(PolicyRow {
            row_index,
            policy_text: record.get(text_col).unwrap_or_default().to_string(),
        });
    }
    Ok(rows)
}
