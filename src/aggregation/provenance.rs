//! Provenance construction for a winning evidence item.

use crate::types::{
    Evidence, MethodProvenance, ModelInfo, ModelProvenance, Provenance, ReferenceProvenance,
};

/// Build provenance from the evidence that supplied a code's confidence.
pub fn build_provenance(winner: &Evidence, description: &str, reference_version: &str) -> Provenance {
    let model = match &winner.model {
        ModelInfo::Remote {
            name,
            provider,
            tokens_used,
        } => ModelProvenance::RemoteModel {
            name: name.clone(),
            provider: provider.clone(),
            tokens_used: *tokens_used,
        },
        ModelInfo::Local { name, version } => ModelProvenance::Local {
            name: name.clone(),
            version: version.clone(),
            marker: ModelProvenance::LOCAL_MARKER.to_string(),
        },
    };

    Provenance {
        method: MethodProvenance {
            name: winner.producer_name.clone(),
            kind: winner.producer_kind(),
            version: winner.producer_version.clone(),
        },
        reference_data: ReferenceProvenance {
            version: reference_version.to_string(),
            description: description.to_string(),
        },
        model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProducerKind;

    #[test]
    fn test_local_shape() {
        let e = Evidence::new(
            "E0100",
            "mock_llm_reasoning",
            "1.0",
            "",
            0.9,
            ModelInfo::Local {
                name: "mock-keyword-matcher".into(),
                version: "1.0".into(),
            },
        );
        let p = build_provenance(&e, "Cane", "2024_Q1");
        assert_eq!(p.method.kind, ProducerKind::Deterministic);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["method"]["type"], "deterministic");
        assert_eq!(json["referenceData"]["description"], "Cane");
        assert_eq!(json["model"]["type"], "mock");
        assert!(json["model"].get("provider").is_none());
    }

    #[test]
    fn test_remote_shape() {
        let e = Evidence::new(
            "E0100",
            "direct_match_groq",
            "1.0",
            "",
            0.9,
            ModelInfo::Remote {
                name: "llama-3.3-70b-versatile".into(),
                provider: "groq".into(),
                tokens_used: 812,
            },
        );
        let p = build_provenance(&e, "", "2024_Q1");
        assert_eq!(p.method.kind, ProducerKind::Llm);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["method"]["type"], "llm");
        assert_eq!(json["model"]["provider"], "groq");
        assert_eq!(json["model"]["tokensUsed"], 812);
        assert!(json["model"].get("type").is_none());
    }
}
