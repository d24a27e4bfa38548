//! Producer invocation, sequential or one rayon task per producer.
//!
//! Either way the reports come back in registration order, so grouping and
//! tie-breaking downstream never depend on which producer finished first.

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::config::ExecutionMode;
use crate::producers::ProducerOutcome;
use crate::traits::EvidenceProducer;

/// What one registered producer returned for one policy text.
#[derive(Debug)]
pub struct ProducerReport {
    pub name: String,
    pub version: String,
    pub outcome: ProducerOutcome,
    pub elapsed_ms: u64,
}

/// Invoke every producer on the text. Output order = registration order.
pub fn collect_evidence(
    producers: &[Box<dyn EvidenceProducer>],
    policy_text: &str,
    mode: ExecutionMode,
) -> Vec<ProducerReport> {
    match mode {
        ExecutionMode::Sequential => producers
            .iter()
            .map(|p| invoke(p.as_ref(), policy_text))
            .collect(),
        ExecutionMode::Parallel => producers
            .par_iter()
            .map(|p| invoke(p.as_ref(), policy_text))
            .collect(),
    }
}

fn invoke(producer: &dyn EvidenceProducer, policy_text: &str) -> ProducerReport {
    let start = Instant::now();
    let outcome = producer.produce(policy_text);
    let elapsed_ms = start.elapsed().as_millis() as u64;

    debug!(
        producer = producer.name(),
        evidence = outcome.evidence().len(),
        elapsed_ms,
        "Producer finished"
    );

    ProducerReport {
        name: producer.name().to_string(),
        version: producer.version().to_string(),
        outcome,
        elapsed_ms,
    }
}
