//! Run-level audit metadata attached to every inference result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit trail for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditMetadata {
    pub pipeline_version: String,
    pub aggregation_version: String,
    /// Unique per invocation.
    pub run_id: Uuid,
    /// blake3 hex digest of the policy text.
    pub input_hash: String,
    pub reference_version: String,
    pub timestamp: DateTime<Utc>,
    pub confidence_threshold: f64,
    /// Every registered producer, in registration order.
    pub producers: Vec<ProducerAudit>,
    pub evidence_count: usize,
    /// Evidence items rejected by the aggregator as malformed.
    pub rejected_evidence_count: usize,
    /// Reported codes absent from reference data (emitted with an empty description).
    pub codes_missing_reference: usize,
    /// Evidence items whose confidence had to be clamped into [0, 1].
    pub clamped_evidence_count: usize,
    /// Distinct codes seen before the threshold was applied.
    pub codes_considered: usize,
    pub codes_above_threshold: usize,
    pub duration_ms: u64,
}

/// Identity and outcome of one producer within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerAudit {
    pub name: String,
    pub version: String,
    pub status: ProducerStatus,
    pub evidence_count: usize,
}

/// What a producer contributed to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProducerStatus {
    Produced,
    Empty { reason: String },
    Degraded { reason: String },
    Failed { reason: String },
}

impl ProducerStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Degraded { .. } | Self::Failed { .. })
    }
}
