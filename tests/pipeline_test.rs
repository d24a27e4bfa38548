//! End-to-end: built-in producers over a reference table, through the engine, into row reports.

use std::sync::Arc;

use hcpcs_inference::config::{PipelineConfig, PipelineSettings, RemoteModelProducerConfig};
use hcpcs_inference::errors::RemoteModelError;
use hcpcs_inference::input::PolicyRow;
use hcpcs_inference::output::{RowReport, RunSummary};
use hcpcs_inference::producers::remote_model::{
    ChatCompletion, ChatRequest, CompletionTransport, TokenUsage,
};
use hcpcs_inference::producers::{build_producers, KeywordMatchProducer, RemoteModelProducer};
use hcpcs_inference::reference::{HcpcsReference, ReferenceEntry};
use hcpcs_inference::traits::EvidenceProducer;
use hcpcs_inference::types::ProducerStatus;
use hcpcs_inference::InferenceEngine;

const WHEELCHAIR_POLICY: &str =
    "Coverage of a standard power wheelchair with special seating is provided when criteria are met.";

fn reference() -> Arc<HcpcsReference> {
    let entries = [
        ("K0823", "Power wheelchair group 2 standard captains chair"),
        ("E0431", "Portable gaseous oxygen system rental"),
        ("E0105", "Cane, quad or three prong"),
    ]
    .into_iter()
    .map(|(code, description)| ReferenceEntry {
        code: code.to_string(),
        description: description.to_string(),
    });
    Arc::new(HcpcsReference::from_entries("2024_Q1", entries))
}

/// Transport that confirms every candidate listed in the prompt whose code appears in `confirm`.
struct ConfirmingTransport {
    confirm: Vec<(&'static str, f64)>,
}

impl CompletionTransport for ConfirmingTransport {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, RemoteModelError> {
        let prompt = &request.messages[1].content;
        let items: Vec<String> = self
            .confirm
            .iter()
            .filter(|(code, _)| prompt.contains(code))
            .map(|(code, confidence)| {
                format!(r#"{{"code": "{code}", "confidence": {confidence}, "reasoning": "policy names it"}}"#)
            })
            .collect();
        Ok(ChatCompletion {
            content: format!("```json\n[{}]\n```", items.join(",")),
            usage: TokenUsage {
                prompt_tokens: 200,
                completion_tokens: 40,
                total_tokens: 240,
            },
        })
    }
}

fn remote_producer(reference: &Arc<HcpcsReference>, confirm: Vec<(&'static str, f64)>) -> Box<dyn EvidenceProducer> {
    let config = RemoteModelProducerConfig {
        enabled: true,
        retry_backoff_ms: 0,
        ..RemoteModelProducerConfig::default()
    };
    Box::new(RemoteModelProducer::new(
        config,
        reference,
        Arc::new(ConfirmingTransport { confirm }),
    ))
}

#[test]
fn keyword_producer_through_engine() {
    let reference = reference();
    let config = PipelineConfig::default();
    let producers = build_producers(&config.producers, &reference).unwrap();
    let engine = InferenceEngine::new(producers, reference, config.pipeline).unwrap();

    let result = engine.run(WHEELCHAIR_POLICY).unwrap();
    assert_eq!(result.codes().collect::<Vec<_>>(), vec!["K0823"]);

    let code = &result.inferred_codes[0];
    assert!((code.aggregated_confidence - 0.8).abs() < 1e-9);
    assert_eq!(code.provenance.method.name, "mock_llm_reasoning");
    assert!(code.justification.starts_with("Found 3 matching keywords"));
    assert_eq!(code.decision_trace.as_ref().map(Vec::len), Some(3));
}

#[test]
fn remote_model_outranks_keyword_match() {
    let reference = reference();
    let producers: Vec<Box<dyn EvidenceProducer>> = vec![
        Box::new(KeywordMatchProducer::new(Default::default(), &reference)),
        remote_producer(&reference, vec![("K0823", 0.93), ("E0105", 0.99)]),
    ];
    let engine = InferenceEngine::new(producers, reference, PipelineSettings::default()).unwrap();

    let result = engine.run(WHEELCHAIR_POLICY).unwrap();
    assert_eq!(result.codes().collect::<Vec<_>>(), vec!["K0823"]);

    let code = &result.inferred_codes[0];
    assert_eq!(code.aggregated_confidence, 0.93);
    assert_eq!(code.justification, "policy names it");
    assert_eq!(code.evidence_count, 2);

    let provenance = serde_json::to_value(&code.provenance).unwrap();
    assert_eq!(provenance["method"]["type"], "llm");
    assert_eq!(provenance["model"]["tokensUsed"], 240);
}

#[test]
fn degraded_remote_model_leaves_keyword_result() {
    struct Unreachable;
    impl CompletionTransport for Unreachable {
        fn complete(&self, _: &ChatRequest) -> Result<ChatCompletion, RemoteModelError> {
            Err(RemoteModelError::Status {
                status: 401,
                message: "invalid api key".into(),
            })
        }
    }

    let reference = reference();
    let remote = RemoteModelProducer::new(
        RemoteModelProducerConfig {
            enabled: true,
            ..RemoteModelProducerConfig::default()
        },
        &reference,
        Arc::new(Unreachable),
    );
    let producers: Vec<Box<dyn EvidenceProducer>> = vec![
        Box::new(KeywordMatchProducer::new(Default::default(), &reference)),
        Box::new(remote),
    ];
    let engine = InferenceEngine::new(producers, reference, PipelineSettings::default()).unwrap();

    let result = engine.run(WHEELCHAIR_POLICY).unwrap();
    assert_eq!(result.codes().collect::<Vec<_>>(), vec!["K0823"]);
    assert!(matches!(
        result.audit.producers[1].status,
        ProducerStatus::Degraded { .. }
    ));
}

#[test]
fn row_reports_carry_run_provenance() {
    let reference = reference();
    let config = PipelineConfig::default();
    let producers = build_producers(&config.producers, &reference).unwrap();
    let engine = InferenceEngine::new(producers, reference, config.pipeline).unwrap();

    let rows = vec![
        PolicyRow {
            row_index: 0,
            policy_text: WHEELCHAIR_POLICY.to_string(),
        },
        PolicyRow {
            row_index: 1,
            policy_text: String::new(),
        },
    ];
    let results = engine.run_rows(&rows).unwrap();

    let report = RowReport::from_row(&results[0], false).unwrap();
    assert_eq!(report.row_index, 0);
    assert_eq!(report.summary.total_codes_found, 1);
    assert_eq!(report.summary.confidence_threshold, 0.75);
    assert_eq!(report.summary.producers_used, vec!["mock_llm_reasoning"]);
    assert!(report.evidence.is_none());

    let code = &report.codes[0];
    assert_eq!(code.code, "K0823");
    assert_eq!(code.confidence, 0.8);
    assert_eq!(code.provenance["pipeline_version"], "1.0.0");
    assert_eq!(
        code.provenance["run_id"],
        results[0].result.audit.run_id.to_string()
    );
    assert_eq!(code.provenance["input_hash"], results[0].result.audit.input_hash);
    assert_eq!(code.provenance["method"]["name"], "mock_llm_reasoning");
    assert!(code.provenance["timestamp"].is_string());

    let empty = RowReport::from_row(&results[1], true).unwrap();
    assert!(empty.codes.is_empty());
    assert_eq!(empty.evidence.map(|e| e.len()), Some(0));

    let summary = RunSummary::from_rows(&results);
    assert_eq!(summary.policies_processed, 2);
    assert_eq!(summary.policies_with_codes, 1);
    assert_eq!(summary.total_codes_found, 1);
    assert_eq!(summary.degraded_producer_runs, 0);

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("\"evidence\""));
}
