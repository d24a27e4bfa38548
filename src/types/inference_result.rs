//! PolicyInferenceResult: whole-run output of the engine.

use serde::{Deserialize, Serialize};

use super::audit::AuditMetadata;
use super::evidence::Evidence;
use super::final_code::FinalCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInferenceResult {
    /// Sorted by aggregated confidence, descending; ties by code, ascending.
    pub inferred_codes: Vec<FinalCode>,
    /// Every evidence item collected during the run, in registration order.
    pub evidence: Vec<Evidence>,
    pub audit: AuditMetadata,
}

impl PolicyInferenceResult {
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.inferred_codes.iter().map(|c| c.code.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.inferred_codes.is_empty()
    }
}
