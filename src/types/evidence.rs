//! Evidence: one producer's scored claim that a code applies to a policy text.

use serde::{Deserialize, Serialize};

use super::metadata::{Metadata, MetadataValue};
use super::provenance::ProducerKind;

/// Coding system tag for HCPCS Level II codes.
pub const HCPCS_CODE_TYPE: &str = "HCPCS";

/// Identity of the model (or model stand-in) behind a piece of evidence.
///
/// The variant decides the provenance shape and the producer kind, so the
/// aggregator never has to probe metadata keys to tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelInfo {
    /// Local computation or mock stand-in.
    Local { name: String, version: String },
    /// Remote hosted model.
    Remote {
        name: String,
        provider: String,
        tokens_used: u64,
    },
}

impl ModelInfo {
    pub fn producer_kind(&self) -> ProducerKind {
        match self {
            Self::Local { .. } => ProducerKind::Deterministic,
            Self::Remote { .. } => ProducerKind::Llm,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } | Self::Remote { name, .. } => name,
        }
    }
}

/// A single claim about one code for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub code: String,
    pub code_type: String,
    pub producer_name: String,
    pub producer_version: String,
    /// Free-text justification from the producer.
    pub raw_output: String,
    /// Confidence in [0.0, 1.0].
    pub normalized_confidence: f64,
    pub model: ModelInfo,
    #[serde(default)]
    pub metadata: Metadata,
    /// Intermediate reasoning steps, if the producer recorded any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_trace: Option<Vec<String>>,
}

impl Evidence {
    /// Create an HCPCS evidence item. Confidence is clamped to [0.0, 1.0].
    pub fn new(
        code: impl Into<String>,
        producer_name: impl Into<String>,
        producer_version: impl Into<String>,
        raw_output: impl Into<String>,
        confidence: f64,
        model: ModelInfo,
    ) -> Self {
        Self {
            code: code.into(),
            code_type: HCPCS_CODE_TYPE.to_string(),
            producer_name: producer_name.into(),
            producer_version: producer_version.into(),
            raw_output: raw_output.into(),
            normalized_confidence: confidence.clamp(0.0, 1.0),
            model,
            metadata: Metadata::new(),
            decision_trace: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_decision_trace(mut self, trace: Vec<String>) -> Self {
        self.decision_trace = Some(trace);
        self
    }

    pub fn producer_kind(&self) -> ProducerKind {
        self.model.producer_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> ModelInfo {
        ModelInfo::Local {
            name: "mock".into(),
            version: "1.0".into(),
        }
    }

    #[test]
    fn test_new_clamps_confidence() {
        let high = Evidence::new("E0100", "p", "1.0", "", 1.7, local());
        assert_eq!(high.normalized_confidence, 1.0);
        let low = Evidence::new("E0100", "p", "1.0", "", -0.2, local());
        assert_eq!(low.normalized_confidence, 0.0);
        assert_eq!(low.code_type, HCPCS_CODE_TYPE);
    }

    #[test]
    fn test_kind_follows_model_variant() {
        let e = Evidence::new("E0100", "p", "1.0", "", 0.5, local());
        assert_eq!(e.producer_kind(), ProducerKind::Deterministic);

        let e = Evidence::new(
            "E0100",
            "p",
            "1.0",
            "",
            0.5,
            ModelInfo::Remote {
                name: "llama".into(),
                provider: "groq".into(),
                tokens_used: 12,
            },
        );
        assert_eq!(e.producer_kind(), ProducerKind::Llm);
    }
}
