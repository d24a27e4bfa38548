//! Defensive screening of evidence before it is grouped.
//!
//! Producers are supposed to hand over clean evidence, but one bad item must
//! not corrupt a whole aggregation: out-of-range confidences are clamped,
//! items with no usable code or confidence are rejected.

use std::borrow::Cow;

use crate::errors::InferenceError;
use crate::types::Evidence;

/// Result of screening one evidence item.
#[derive(Debug)]
pub enum Screened<'a> {
    /// Usable as-is (borrowed) or after trimming the code (owned).
    Accepted(Cow<'a, Evidence>),
    /// Confidence was outside [0, 1] and has been clamped.
    Clamped(Evidence),
    Rejected(InferenceError),
}

/// Screen a single evidence item.
pub fn screen_evidence(evidence: &Evidence) -> Screened<'_> {
    let code = evidence.code.trim();
    if code.is_empty() {
        return Screened::Rejected(malformed(evidence, "empty code"));
    }
    if evidence.producer_name.trim().is_empty() {
        return Screened::Rejected(malformed(evidence, "empty producer name"));
    }

    let confidence = evidence.normalized_confidence;
    if !confidence.is_finite() {
        return Screened::Rejected(malformed(
            evidence,
            &format!("non-finite confidence {}", confidence),
        ));
    }

    let needs_trim = code.len() != evidence.code.len();
    let out_of_range = !(0.0..=1.0).contains(&confidence);

    if out_of_range {
        let mut fixed = evidence.clone();
        fixed.code = code.to_string();
        fixed.normalized_confidence = confidence.clamp(0.0, 1.0);
        return Screened::Clamped(fixed);
    }

    if needs_trim {
        let mut fixed = evidence.clone();
        fixed.code = code.to_string();
        return Screened::Accepted(Cow::Owned(fixed));
    }

    Screened::Accepted(Cow::Borrowed(evidence))
}

fn malformed(evidence: &Evidence, reason: &str) -> InferenceError {
    InferenceError::MalformedEvidence {
        producer: evidence.producer_name.clone(),
        code: evidence.code.clone(),
        reason: reason.to_string(),
    }
}
