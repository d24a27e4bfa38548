//! Provenance: how a final code's confidence and justification were derived.

use serde::{Deserialize, Serialize};

/// Category of the producer behind the winning evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerKind {
    /// Local, reproducible computation (including mock stand-ins).
    Deterministic,
    /// Hosted language model.
    Llm,
}

impl ProducerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Llm => "llm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub method: MethodProvenance,
    #[serde(rename = "referenceData")]
    pub reference_data: ReferenceProvenance,
    pub model: ModelProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodProvenance {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProducerKind,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProvenance {
    pub version: String,
    pub description: String,
}

/// Model details. Shape depends on whether the winner came from a remote model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelProvenance {
    RemoteModel {
        name: String,
        provider: String,
        #[serde(rename = "tokensUsed")]
        tokens_used: u64,
    },
    Local {
        name: String,
        version: String,
        /// Always "mock".
        #[serde(rename = "type")]
        marker: String,
    },
}

impl ModelProvenance {
    pub const LOCAL_MARKER: &'static str = "mock";
}
