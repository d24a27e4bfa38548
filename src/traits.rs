//! `EvidenceProducer` and `ReferenceLookup`: the two seams the engine is built around.
//!
//! Producers are held as trait objects in registration order; the reference
//! lookup is shared read-only across producers and the aggregator.

use std::collections::{BTreeMap, HashMap};

use crate::producers::ProducerOutcome;
use crate::types::Evidence;

// ── EvidenceProducer ──

/// An inference method: turns a policy text into evidence records.
///
/// Implementations must:
/// - return `ProducerOutcome::Empty` for empty or whitespace-only text
/// - clamp confidences into [0.0, 1.0] before returning
/// - map expected failures (missing credentials, unreachable service,
///   malformed upstream data) to `ProducerOutcome::Degraded`
pub trait EvidenceProducer: Send + Sync {
    /// Stable, non-empty identifier carried into evidence and audit metadata.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Run the method and report what happened.
    fn produce(&self, policy_text: &str) -> ProducerOutcome;

    /// Evidence only. Degradations and failures yield an empty sequence.
    fn infer(&self, policy_text: &str) -> Vec<Evidence> {
        self.produce(policy_text).into_evidence()
    }
}

// ── ReferenceLookup ──

/// Code → description lookup, loaded once and static for the engine's lifetime.
pub trait ReferenceLookup: Send + Sync {
    fn lookup(&self, code: &str) -> Option<&str>;

    fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }
}

impl ReferenceLookup for HashMap<String, String> {
    fn lookup(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

impl ReferenceLookup for BTreeMap<String, String> {
    fn lookup(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

/// Lookup with no entries; every description resolves to empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyReference;

impl ReferenceLookup for EmptyReference {
    fn lookup(&self, _code: &str) -> Option<&str> {
        None
    }
}
