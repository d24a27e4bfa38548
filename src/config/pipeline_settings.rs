//! Run-level settings: threshold, version strings, execution mode.

use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_unit_interval};
use crate::errors::InferenceResult;

/// How the engine invokes its registered producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One producer after another, in registration order.
    #[default]
    Sequential,
    /// One rayon task per producer; results merged in registration order.
    Parallel,
}

/// Settings shared by every run of the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Minimum aggregated confidence for a code to be reported.
    pub confidence_threshold: f64,
    pub pipeline_version: String,
    pub aggregation_version: String,
    /// Version tag of the HCPCS reference table.
    pub reference_version: String,
    pub execution: ExecutionMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.75,
            pipeline_version: "1.0.0".to_string(),
            aggregation_version: "max_confidence_v1".to_string(),
            reference_version: "2024_Q1".to_string(),
            execution: ExecutionMode::Sequential,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> InferenceResult<()> {
        require_unit_interval("pipeline.confidence_threshold", self.confidence_threshold)?;
        require_non_empty("pipeline.pipeline_version", &self.pipeline_version)?;
        require_non_empty("pipeline.aggregation_version", &self.aggregation_version)?;
        require_non_empty("pipeline.reference_version", &self.reference_version)?;
        Ok(())
    }
}
