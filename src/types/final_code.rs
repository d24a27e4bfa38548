//! FinalCode: one code's aggregated verdict for one input text.

use serde::{Deserialize, Serialize};

use super::provenance::Provenance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalCode {
    pub code: String,
    /// Empty when the code is missing from reference data.
    pub code_description: String,
    /// Maximum confidence across all evidence for this code.
    pub aggregated_confidence: f64,
    /// Raw output of the winning evidence.
    pub justification: String,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_trace: Option<Vec<String>>,
    /// How many evidence items were merged into this verdict.
    pub evidence_count: usize,
}
