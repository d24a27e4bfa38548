//! KeywordMatchProducer: deterministic keyword-overlap stand-in for a reasoning model.
//!
//! A code is claimed when its description shares at least `min_matches`
//! keywords with the policy. Confidence = min(base + increment × matches, max).

use tracing::debug;

use super::keywords::{KeywordExtractor, KeywordIndex};
use super::outcome::{EmptyReason, ProducerOutcome};
use crate::config::KeywordProducerConfig;
use crate::reference::HcpcsReference;
use crate::traits::EvidenceProducer;
use crate::types::{Evidence, ModelInfo};

pub struct KeywordMatchProducer {
    config: KeywordProducerConfig,
    extractor: KeywordExtractor,
    index: KeywordIndex,
}

impl KeywordMatchProducer {
    pub fn new(config: KeywordProducerConfig, reference: &HcpcsReference) -> Self {
        let extractor = KeywordExtractor::new(config.min_keyword_len);
        let index = KeywordIndex::build(reference, &extractor);
        debug!(codes = index.len(), producer = %config.name, "Keyword index built");
        Self {
            config,
            extractor,
            index,
        }
    }

    /// Confidence for a given number of matched keywords.
    pub fn confidence_for(&self, matches: usize) -> f64 {
        let raw = self.config.base_confidence + self.config.per_match_increment * matches as f64;
        raw.min(self.config.max_confidence).clamp(0.0, 1.0)
    }

    fn model(&self) -> ModelInfo {
        ModelInfo::Local {
            name: self.config.model_name.clone(),
            version: self.config.model_version.clone(),
        }
    }
}

impl EvidenceProducer for KeywordMatchProducer {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn version(&self) -> &str {
        &self.config.version
    }

    fn produce(&self, policy_text: &str) -> ProducerOutcome {
        if policy_text.trim().is_empty() {
            return ProducerOutcome::Empty(EmptyReason::BlankInput);
        }

        let policy_keywords = self.extractor.extract(policy_text);
        if policy_keywords.is_empty() {
            return ProducerOutcome::Empty(EmptyReason::NoKeywords);
        }

        let mut evidence = Vec::new();
        for entry in self.index.iter() {
            let matching = entry.overlap(&policy_keywords);
            let num_matches = matching.len();
            if num_matches < self.config.min_matches {
                continue;
            }

            let confidence = self.confidence_for(num_matches);
            let listed = matching
                .iter()
                .take(self.config.max_listed_terms)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            let reasoning = format!(
                "Found {} matching keywords ({}) between policy text and HCPCS {}: '{}'",
                num_matches, listed, entry.code, entry.description
            );
            let trace = vec![
                format!("Extracted {} keywords from policy text", policy_keywords.len()),
                format!(
                    "Matched {} of {} description keywords for {}",
                    num_matches,
                    entry.keywords.len(),
                    entry.code
                ),
                format!(
                    "Confidence min({} + {} x {}, {}) = {:.2}",
                    self.config.base_confidence,
                    self.config.per_match_increment,
                    num_matches,
                    self.config.max_confidence,
                    confidence
                ),
            ];

            evidence.push(
                Evidence::new(
                    entry.code.clone(),
                    self.config.name.clone(),
                    self.config.version.clone(),
                    reasoning,
                    confidence,
                    self.model(),
                )
                .with_metadata("model_name", self.config.model_name.as_str())
                .with_metadata("model_version", self.config.model_version.as_str())
                .with_metadata(
                    "prompt_template_version",
                    self.config.prompt_template_version.as_str(),
                )
                .with_metadata("matching_keywords", matching)
                .with_metadata("num_matches", num_matches)
                .with_decision_trace(trace),
            );
        }

        debug!(
            producer = %self.config.name,
            keywords = policy_keywords.len(),
            claimed = evidence.len(),
            "Keyword matching complete"
        );

        ProducerOutcome::from_evidence(evidence, EmptyReason::NoMatches)
    }
}
