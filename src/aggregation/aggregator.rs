//! Max-confidence aggregation with threshold filtering.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::{debug, warn};

use super::provenance::build_provenance;
use super::screening::{screen_evidence, Screened};
use crate::config::PipelineSettings;
use crate::errors::ErrorChain;
use crate::traits::ReferenceLookup;
use crate::types::{Evidence, FinalCode};

/// Everything the aggregator learned from one evidence collection.
#[derive(Debug, Default)]
pub struct AggregationOutcome {
    /// Codes that cleared the threshold, ranked.
    pub codes: Vec<FinalCode>,
    /// Distinct codes seen among accepted evidence.
    pub codes_considered: usize,
    /// Codes seen in evidence but absent from reference data (kept, empty description).
    pub codes_missing_reference: usize,
    pub rejected: usize,
    pub clamped: usize,
}

/// Groups evidence by code and keeps each code's strongest claim.
#[derive(Debug, Clone)]
pub struct Aggregator {
    threshold: f64,
    reference_version: String,
}

impl Aggregator {
    pub fn new(threshold: f64, reference_version: impl Into<String>) -> Self {
        Self {
            threshold,
            reference_version: reference_version.into(),
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.confidence_threshold, settings.reference_version.clone())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Aggregate evidence into ranked final codes.
    pub fn aggregate(&self, evidence: &[Evidence], reference: &dyn ReferenceLookup) -> Vec<FinalCode> {
        self.aggregate_with_report(evidence, reference).codes
    }

    /// Aggregate and also report how many items were rejected or clamped.
    pub fn aggregate_with_report(
        &self,
        evidence: &[Evidence],
        reference: &dyn ReferenceLookup,
    ) -> AggregationOutcome {
        let mut outcome = AggregationOutcome::default();
        let mut errors = ErrorChain::new();

        // Group by code, preserving first-seen order of codes and of items within a code.
        let mut groups: Vec<(String, Vec<Cow<'_, Evidence>>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (step, item) in evidence.iter().enumerate() {
            let accepted = match screen_evidence(item) {
                Screened::Accepted(e) => e,
                Screened::Clamped(e) => {
                    outcome.clamped += 1;
                    debug!(
                        code = %e.code,
                        producer = %e.producer_name,
                        original = item.normalized_confidence,
                        "Clamped out-of-range evidence confidence"
                    );
                    Cow::Owned(e)
                }
                Screened::Rejected(err) => {
                    outcome.rejected += 1;
                    errors.push(step, err);
                    continue;
                }
            };

            match index.get(accepted.code.as_str()) {
                Some(&slot) => groups[slot].1.push(accepted),
                None => {
                    index.insert(accepted.code.clone(), groups.len());
                    groups.push((accepted.code.clone(), vec![accepted]));
                }
            }
        }

        errors.log_summary("Evidence screening");
        outcome.codes_considered = groups.len();

        for (code, group) in groups {
            let winner = match strongest(&group) {
                Some(w) => w,
                None => continue,
            };
            let max_confidence = winner.normalized_confidence;

            if max_confidence < self.threshold {
                debug!(
                    code = %code,
                    confidence = max_confidence,
                    threshold = self.threshold,
                    "Code below threshold, dropped"
                );
                continue;
            }

            let description = match reference.lookup(&code) {
                Some(d) => d.to_string(),
                None => {
                    outcome.codes_missing_reference += 1;
                    warn!(code = %code, "Code not found in reference data, emitting with empty description");
                    String::new()
                }
            };

            let provenance = build_provenance(winner, &description, &self.reference_version);

            outcome.codes.push(FinalCode {
                code,
                code_description: description,
                aggregated_confidence: max_confidence,
                justification: winner.raw_output.clone(),
                provenance,
                decision_trace: winner.decision_trace.clone(),
                evidence_count: group.len(),
            });
        }

        rank(&mut outcome.codes);
        outcome
    }
}

/// First item reaching the group's maximum confidence.
fn strongest<'g>(group: &'g [Cow<'_, Evidence>]) -> Option<&'g Evidence> {
    let mut best: Option<&Evidence> = None;
    for item in group {
        match best {
            Some(b) if item.normalized_confidence <= b.normalized_confidence => {}
            _ => best = Some(&**item),
        }
    }
    best
}

/// Confidence descending, then code ascending.
fn rank(codes: &mut [FinalCode]) {
    codes.sort_by(|a, b| {
        b.aggregated_confidence
            .total_cmp(&a.aggregated_confidence)
            .then_with(|| a.code.cmp(&b.code))
    });
}
