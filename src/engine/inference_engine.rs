//! InferenceEngine: run every producer over a policy text, merge, audit.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::audit::{current_timestamp, generate_run_id, hash_text};
use super::collection::collect_evidence;
use crate::aggregation::Aggregator;
use crate::config::PipelineSettings;
use crate::errors::{ErrorChain, InferenceError, InferenceResult, RecoveryAction};
use crate::input::PolicyRow;
use crate::producers::ProducerOutcome;
use crate::traits::{EvidenceProducer, ReferenceLookup};
use crate::types::{AuditMetadata, PolicyInferenceResult, ProducerAudit};

/// The inference engine. Holds producers in registration order; keeps no per-run state.
pub struct InferenceEngine {
    producers: Vec<Box<dyn EvidenceProducer>>,
    reference: Arc<dyn ReferenceLookup>,
    settings: PipelineSettings,
    aggregator: Aggregator,
}

/// One input row's result.
#[derive(Debug, Clone)]
pub struct RowResult {
    pub row_index: usize,
    pub result: PolicyInferenceResult,
}

impl InferenceEngine {
    /// Build an engine. Fails with `NoProducers` if `producers` is empty and
    /// with `Config` if the settings or a producer identity are invalid.
    pub fn new(
        producers: Vec<Box<dyn EvidenceProducer>>,
        reference: Arc<dyn ReferenceLookup>,
        settings: PipelineSettings,
    ) -> InferenceResult<Self> {
        if producers.is_empty() {
            return Err(InferenceError::NoProducers);
        }
        settings.validate()?;

        for producer in &producers {
            if producer.name().trim().is_empty() {
                return Err(InferenceError::Config(
                    "producer registered with an empty name".to_string(),
                ));
            }
        }

        info!(
            producers = producers.len(),
            threshold = settings.confidence_threshold,
            execution = ?settings.execution,
            "Inference engine ready"
        );

        Ok(Self {
            aggregator: Aggregator::from_settings(&settings),
            producers,
            reference,
            settings,
        })
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// (name, version) of every registered producer, in registration order.
    pub fn producer_identities(&self) -> Vec<(String, String)> {
        self.producers
            .iter()
            .map(|p| (p.name().to_string(), p.version().to_string()))
            .collect()
    }

    /// Run the pipeline on one policy text.
    ///
    /// Degraded or failed producers contribute no evidence and the run goes on.
    /// The only producer failure that aborts the run is one whose recovery
    /// action is `Escalate`, which is reserved for configuration errors. Data
    /// and I/O errors raised inside a producer cost only that producer's evidence.
    pub fn run(&self, policy_text: &str) -> InferenceResult<PolicyInferenceResult> {
        let start = Instant::now();
        let run_id = generate_run_id();
        let input_hash = hash_text(policy_text);

        let reports = collect_evidence(&self.producers, policy_text, self.settings.execution);

        let mut evidence = Vec::new();
        let mut producer_audits = Vec::with_capacity(reports.len());
        let mut failures = ErrorChain::new();

        for (step, report) in reports.into_iter().enumerate() {
            let status = report.outcome.status();
            let contributed = report.outcome.evidence().len();

            match report.outcome {
                ProducerOutcome::Produced(items) => evidence.extend(items),
                ProducerOutcome::Empty(reason) => {
                    debug!(producer = %report.name, reason = reason.as_str(), "Producer returned no evidence");
                }
                ProducerOutcome::Degraded(e) => {
                    warn!(producer = %report.name, error = %e, "Producer degraded, no evidence");
                    failures.push(step, e);
                }
                ProducerOutcome::Failed(e) => {
                    let action = RecoveryAction::for_error(&e);
                    if action == RecoveryAction::Escalate {
                        error!(producer = %report.name, error = %e, run_id = %run_id, "Producer failure escalated, aborting run");
                        return Err(e);
                    }
                    failures.push(
                        step,
                        InferenceError::ProducerFailed {
                            producer: report.name.clone(),
                            reason: e.to_string(),
                        },
                    );
                }
            }

            producer_audits.push(ProducerAudit {
                name: report.name,
                version: report.version,
                status,
                evidence_count: contributed,
            });
        }

        failures.log_summary("Producer collection");

        let outcome = self
            .aggregator
            .aggregate_with_report(&evidence, self.reference.as_ref());

        let audit = AuditMetadata {
            pipeline_version: self.settings.pipeline_version.clone(),
            aggregation_version: self.settings.aggregation_version.clone(),
            run_id,
            input_hash,
            reference_version: self.settings.reference_version.clone(),
            timestamp: current_timestamp(),
            confidence_threshold: self.settings.confidence_threshold,
            producers: producer_audits,
            evidence_count: evidence.len(),
            rejected_evidence_count: outcome.rejected,
            codes_missing_reference: outcome.codes_missing_reference,
            clamped_evidence_count: outcome.clamped,
            codes_considered: outcome.codes_considered,
            codes_above_threshold: outcome.codes.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            run_id = %audit.run_id,
            evidence = audit.evidence_count,
            considered = audit.codes_considered,
            selected = audit.codes_above_threshold,
            rejected = audit.rejected_evidence_count,
            duration_ms = audit.duration_ms,
            "Inference run complete"
        );

        Ok(PolicyInferenceResult {
            inferred_codes: outcome.codes,
            evidence,
            audit,
        })
    }

    /// Run every row in order. Row order is preserved in the output.
    pub fn run_rows(&self, rows: &[PolicyRow]) -> InferenceResult<Vec<RowResult>> {
        let mut results = Vec::with_capacity(rows.len());
        for (processed, row) in rows.iter().enumerate() {
            let result = self.run(&row.policy_text)?;
            results.push(RowResult {
                row_index: row.row_index,
                result,
            });
            if (processed + 1) % 10 == 0 {
                info!(processed = processed + 1, total = rows.len(), "Processed policies");
            }
        }
        Ok(results)
    }
}
