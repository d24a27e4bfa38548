//! Aggregation tests: max-confidence merge, threshold, ranking, provenance.

use std::collections::HashMap;

use hcpcs_inference::aggregation::Aggregator;
use hcpcs_inference::traits::EmptyReference;
use hcpcs_inference::types::{Evidence, ModelInfo, ProducerKind};

fn local(name: &str) -> ModelInfo {
    ModelInfo::Local {
        name: name.to_string(),
        version: "1.0".to_string(),
    }
}

fn evidence(code: &str, producer: &str, confidence: f64) -> Evidence {
    Evidence::new(
        code,
        producer,
        "1.0",
        format!("{producer} says {code}"),
        confidence,
        local("fixed"),
    )
}

fn reference() -> HashMap<String, String> {
    [
        ("A1111", "Alpha device"),
        ("B2222", "Beta device"),
        ("E0100", "Cane"),
    ]
    .into_iter()
    .map(|(c, d)| (c.to_string(), d.to_string()))
    .collect()
}

fn aggregator() -> Aggregator {
    Aggregator::new(0.75, "2024_Q1")
}

#[test]
fn single_confident_claim_is_selected() {
    let codes = aggregator().aggregate(&[evidence("E0100", "fixed", 0.9)], &reference());
    assert_eq!(codes.len(), 1);
    let code = &codes[0];
    assert_eq!(code.code, "E0100");
    assert_eq!(code.code_description, "Cane");
    assert_eq!(code.aggregated_confidence, 0.9);
    assert_eq!(code.justification, "fixed says E0100");
    assert_eq!(code.provenance.method.name, "fixed");
    assert_eq!(code.provenance.method.kind, ProducerKind::Deterministic);
    assert_eq!(code.provenance.reference_data.version, "2024_Q1");
    assert_eq!(code.provenance.reference_data.description, "Cane");
}

#[test]
fn low_confidence_claim_is_dropped() {
    let codes = aggregator().aggregate(&[evidence("E0100", "fixed", 0.5)], &reference());
    assert!(codes.is_empty());
}

#[test]
fn strongest_producer_wins_the_code() {
    let codes = aggregator().aggregate(
        &[evidence("E0100", "p1", 0.6), evidence("E0100", "p2", 0.9)],
        &reference(),
    );
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].aggregated_confidence, 0.9);
    assert_eq!(codes[0].justification, "p2 says E0100");
    assert_eq!(codes[0].provenance.method.name, "p2");
    assert_eq!(codes[0].evidence_count, 2);
}

#[test]
fn codes_ranked_by_confidence() {
    let codes = aggregator().aggregate(
        &[evidence("B2222", "fixed", 0.8), evidence("A1111", "fixed", 0.9)],
        &reference(),
    );
    let order: Vec<_> = codes.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(order, vec!["A1111", "B2222"]);
}

#[test]
fn equal_confidence_codes_ranked_by_code() {
    let codes = aggregator().aggregate(
        &[evidence("B2222", "fixed", 0.8), evidence("A1111", "fixed", 0.8)],
        &reference(),
    );
    let order: Vec<_> = codes.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(order, vec!["A1111", "B2222"]);
}

#[test]
fn first_evidence_at_max_wins_within_group() {
    let codes = aggregator().aggregate(
        &[
            evidence("E0100", "first", 0.9),
            evidence("E0100", "second", 0.9),
        ],
        &reference(),
    );
    assert_eq!(codes[0].provenance.method.name, "first");
}

#[test]
fn threshold_is_inclusive() {
    let codes = aggregator().aggregate(&[evidence("E0100", "fixed", 0.75)], &reference());
    assert_eq!(codes.len(), 1);
}

#[test]
fn empty_evidence_yields_no_codes() {
    assert!(aggregator().aggregate(&[], &reference()).is_empty());
}

#[test]
fn code_missing_from_reference_still_emitted() {
    let outcome = aggregator()
        .aggregate_with_report(&[evidence("Z9999", "fixed", 0.95)], &EmptyReference);
    assert_eq!(outcome.codes.len(), 1);
    assert_eq!(outcome.codes[0].code_description, "");
    assert_eq!(outcome.codes_missing_reference, 1);
}

#[test]
fn malformed_evidence_rejected_or_clamped() {
    let mut over = evidence("A1111", "fixed", 0.9);
    over.normalized_confidence = 1.4;
    let mut nan = evidence("B2222", "fixed", 0.9);
    nan.normalized_confidence = f64::NAN;
    let blank = evidence("   ", "fixed", 0.9);
    let padded = evidence(" E0100 ", "fixed", 0.8);

    let outcome = aggregator().aggregate_with_report(&[over, nan, blank, padded], &reference());

    assert_eq!(outcome.rejected, 2);
    assert_eq!(outcome.clamped, 1);
    let codes: Vec<_> = outcome.codes.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["A1111", "E0100"]);
    assert_eq!(outcome.codes[0].aggregated_confidence, 1.0);
}

#[test]
fn provenance_model_shape_follows_model_info() {
    let remote = Evidence::new(
        "A1111",
        "direct_match_groq",
        "1.0",
        "model says so",
        0.9,
        ModelInfo::Remote {
            name: "llama-3.3-70b-versatile".into(),
            provider: "groq".into(),
            tokens_used: 321,
        },
    );
    let codes = aggregator().aggregate(&[remote, evidence("B2222", "fixed", 0.8)], &reference());

    let remote_json = serde_json::to_value(&codes[0].provenance).unwrap();
    assert_eq!(remote_json["method"]["type"], "llm");
    assert_eq!(remote_json["model"]["provider"], "groq");
    assert_eq!(remote_json["model"]["tokensUsed"], 321);
    assert_eq!(remote_json["referenceData"]["description"], "Alpha device");

    let local_json = serde_json::to_value(&codes[1].provenance).unwrap();
    assert_eq!(local_json["method"]["type"], "deterministic");
    assert_eq!(local_json["model"]["type"], "mock");
    assert_eq!(local_json["model"]["version"], "1.0");
}

#[test]
fn decision_trace_copied_from_winner() {
    let traced = evidence("E0100", "fixed", 0.9).with_decision_trace(vec!["step".into()]);
    let codes = aggregator().aggregate(&[evidence("E0100", "other", 0.8), traced], &reference());
    assert_eq!(codes[0].decision_trace, Some(vec!["step".to_string()]));
}
