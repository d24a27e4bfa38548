//! Output documents: per-row reports and the run-level summary written by the CLI.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::engine::RowResult;
use crate::errors::InferenceResult;
use crate::types::{Evidence, FinalCode, PolicyInferenceResult};

/// Confidence as reported: rounded to three decimals.
pub fn round_confidence(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeReport {
    pub code: String,
    pub confidence: f64,
    pub justification: String,
    /// Code provenance plus the run's timestamp, pipeline version, run id and input hash.
    pub provenance: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSummary {
    pub total_codes_found: usize,
    pub confidence_threshold: f64,
    pub producers_used: Vec<String>,
}

/// One input row as written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub row_index: usize,
    pub codes: Vec<CodeReport>,
    pub summary: RowSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<Evidence>>,
}

impl RowReport {
    pub fn from_result(
        row_index: usize,
        result: &PolicyInferenceResult,
        include_evidence: bool,
    ) -> InferenceResult<Self> {
        let codes = result
            .inferred_codes
            .iter()
            .map(|code| code_report(code, result))
            .collect::<InferenceResult<Vec<_>>>()?;

        Ok(Self {
            row_index,
            summary: RowSummary {
                total_codes_found: codes.len(),
                confidence_threshold: result.audit.confidence_threshold,
                producers_used: result.audit.producers.iter().map(|p| p.name.clone()).collect(),
            },
            codes,
            evidence: include_evidence.then(|| result.evidence.clone()),
        })
    }

    pub fn from_row(row: &RowResult, include_evidence: bool) -> InferenceResult<Self> {
        Self::from_result(row.row_index, &row.result, include_evidence)
    }
}

fn code_report(code: &FinalCode, result: &PolicyInferenceResult) -> InferenceResult<CodeReport> {
    let audit = &result.audit;
    let mut provenance = match serde_json::to_value(&code.provenance)? {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    provenance.insert("timestamp".to_string(), Value::String(audit.timestamp.to_rfc3339()));
    provenance.insert(
        "pipeline_version".to_string(),
        Value::String(audit.pipeline_version.clone()),
    );
    provenance.insert("run_id".to_string(), Value::String(audit.run_id.to_string()));
    provenance.insert("input_hash".to_string(), Value::String(audit.input_hash.clone()));

    Ok(CodeReport {
        code: code.code.clone(),
        confidence: round_confidence(code.aggregated_confidence),
        justification: code.justification.clone(),
        provenance: Value::Object(provenance),
    })
}

/// Totals across every processed row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub policies_processed: usize,
    pub policies_with_codes: usize,
    pub total_codes_found: usize,
    pub total_evidence: usize,
    pub degraded_producer_runs: usize,
}

impl RunSummary {
    pub fn from_rows(rows: &[RowResult]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            let codes = row.result.inferred_codes.len();
            acc.policies_processed += 1;
            acc.total_codes_found += codes;
            acc.total_evidence += row.result.evidence.len();
            if codes > 0 {
                acc.policies_with_codes += 1;
            }
            acc.degraded_producer_runs += row
                .result
                .audit
                .producers
                .iter()
                .filter(|p| p.status.is_failure())
                .count();
            acc
        })
    }
}
