//! RemoteModelProducer: asks a hosted chat model which shortlisted codes a policy covers.
//!
//! Flow per policy:
//! 1. Rank reference codes by description keyword overlap, keep the top K.
//! 2. Send the (truncated) policy plus the shortlist to the model.
//! 3. Parse the JSON verdicts, drop codes absent from the reference table,
//!    clamp confidences, and emit one evidence item per confirmed code.
//!    Codes the model confirms outside the shortlist keep a similarity score of 0.0.
//!
//! Transport and parse problems degrade the producer; they never fail the run.

mod candidates;
mod reply;
mod transport;

pub use candidates::{rank_candidates, Candidate};
pub use reply::{extract_json_array, parse_reply, ModelVerdict, ParsedReply};
pub use transport::{
    ChatCompletion, ChatMessage, ChatRequest, CompletionTransport, HttpCompletionTransport,
    TokenUsage,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::keywords::{KeywordExtractor, KeywordIndex};
use super::outcome::{EmptyReason, ProducerOutcome};
use crate::config::RemoteModelProducerConfig;
use crate::errors::{InferenceError, RecoveryAction, RemoteModelError};
use crate::reference::HcpcsReference;
use crate::traits::{EvidenceProducer, ReferenceLookup};
use crate::types::{Evidence, ModelInfo};

const TRUNCATION_MARKER: &str = "\n...[truncated]";
const TOP_P: f32 = 0.9;
const MATCHING_METHOD: &str = "description_similarity_prefilter";

const SYSTEM_PROMPT: &str = "You are a medical coding assistant. You decide which HCPCS codes a \
coverage policy applies to. Answer only with a JSON array.";

pub struct RemoteModelProducer {
    config: RemoteModelProducerConfig,
    transport: Arc<dyn CompletionTransport>,
    reference: Arc<HcpcsReference>,
    extractor: KeywordExtractor,
    index: KeywordIndex,
}

impl RemoteModelProducer {
    pub fn new(
        config: RemoteModelProducerConfig,
        reference: &Arc<HcpcsReference>,
        transport: Arc<dyn CompletionTransport>,
    ) -> Self {
        let extractor = KeywordExtractor::default();
        let index = KeywordIndex::build(reference, &extractor);
        debug!(
            producer = %config.name,
            model = %config.model,
            codes = index.len(),
            "Remote model producer ready"
        );
        Self {
            config,
            transport,
            reference: Arc::clone(reference),
            extractor,
            index,
        }
    }

    /// Producer backed by the HTTP transport described in `config`.
    pub fn with_http(
        config: RemoteModelProducerConfig,
        reference: &Arc<HcpcsReference>,
    ) -> Result<Self, RemoteModelError> {
        let transport = HttpCompletionTransport::from_config(&config)?;
        if !transport.has_credentials() {
            warn!(
                producer = %config.name,
                env_var = %config.api_key_env,
                "API key not set; producer will degrade on every call"
            );
        }
        Ok(Self::new(config, reference, Arc::new(transport)))
    }

    fn build_request(&self, policy_text: &str, candidates: &[Candidate]) -> ChatRequest {
        let policy = truncate_policy(policy_text, self.config.max_policy_chars);
        let listing = candidates
            .iter()
            .map(|c| format!("- {}: {}", c.code, c.description))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Policy text:\n{policy}\n\n\
             Candidate HCPCS codes:\n{listing}\n\n\
             For each candidate the policy clearly covers, return an object with \
             \"code\", \"confidence\" (0.0 to 1.0) and \"reasoning\" (one sentence). \
             Return [] if none apply. Respond with the JSON array only."
        );

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: TOP_P,
        }
    }

    /// Call the transport, retrying transient errors with linear backoff.
    fn complete_with_retry(&self, request: &ChatRequest) -> Result<ChatCompletion, RemoteModelError> {
        let mut attempt: u32 = 0;
        loop {
            match self.transport.complete(request) {
                Ok(completion) => return Ok(completion),
                Err(e) => {
                    let action = RecoveryAction::for_error(&InferenceError::RemoteModel(e.clone()));
                    if action != RecoveryAction::Retry || attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    attempt += 1;
                    let backoff = self.config.retry_backoff_ms * u64::from(attempt);
                    warn!(
                        producer = %self.config.name,
                        attempt,
                        backoff_ms = backoff,
                        error = %e,
                        "Transient remote model error, retrying"
                    );
                    if backoff > 0 {
                        thread::sleep(Duration::from_millis(backoff));
                    }
                }
            }
        }
    }
}

impl EvidenceProducer for RemoteModelProducer {
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

        let candidates = rank_candidates(
            &self.index,
            &policy_keywords,
            self.config.min_candidate_score,
            self.config.top_k_codes,
        );
        if candidates.is_empty() {
            return ProducerOutcome::Empty(EmptyReason::NoMatches);
        }

        let request = self.build_request(policy_text, &candidates);
        let completion = match self.complete_with_retry(&request) {
            Ok(c) => c,
            Err(e) => {
                warn!(producer = %self.config.name, error = %e, "Remote model unavailable");
                return ProducerOutcome::Degraded(e.into());
            }
        };

        let parsed = match parse_reply(&completion.content) {
            Ok(p) => p,
            Err(e) => {
                warn!(producer = %self.config.name, error = %e, "Unusable model reply");
                return ProducerOutcome::Degraded(e.into());
            }
        };
        for skipped in &parsed.skipped {
            debug!(producer = %self.config.name, reason = %skipped, "Skipped model verdict");
        }

        let shortlist: HashMap<&str, &Candidate> =
            candidates.iter().map(|c| (c.code.as_str(), c)).collect();
        let usage = completion.usage;
        let model = ModelInfo::Remote {
            name: self.config.model.clone(),
            provider: self.config.provider.clone(),
            tokens_used: usage.total_tokens,
        };

        let mut evidence = Vec::new();
        for verdict in parsed.verdicts {
            if !self.reference.contains(&verdict.code) {
                debug!(
                    producer = %self.config.name,
                    code = %verdict.code,
                    "Model returned a code absent from reference data"
                );
                continue;
            }

            let shortlisted = shortlist.get(verdict.code.as_str());
            let score = shortlisted.map_or(0.0, |c| c.score);
            let similarity = match shortlisted {
                Some(_) => format!("{} similarity score {:.3}", verdict.code, score),
                None => format!("{} was not shortlisted", verdict.code),
            };
            let trace = vec![
                format!(
                    "Shortlisted {} candidate codes by description similarity",
                    candidates.len()
                ),
                similarity,
                format!("Model {} confirmed {}", self.config.model, verdict.code),
            ];

            evidence.push(
                Evidence::new(
                    verdict.code,
                    self.config.name.clone(),
                    self.config.version.clone(),
                    verdict.reasoning,
                    verdict.confidence,
                    model.clone(),
                )
                .with_metadata("model_name", self.config.model.as_str())
                .with_metadata("api_provider", self.config.provider.as_str())
                .with_metadata("matching_method", MATCHING_METHOD)
                .with_metadata("description_similarity_score", score)
                .with_metadata("num_candidate_codes", candidates.len())
                .with_metadata("prompt_tokens", usage.prompt_tokens)
                .with_metadata("completion_tokens", usage.completion_tokens)
                .with_metadata("total_tokens", usage.total_tokens)
                .with_decision_trace(trace),
            );
        }

        info!(
            producer = %self.config.name,
            candidates = candidates.len(),
            confirmed = evidence.len(),
            tokens = usage.total_tokens,
            "Remote model inference complete"
        );

        ProducerOutcome::from_evidence(evidence, EmptyReason::NoneConfirmed)
    }
}

/// Cap policy text at `max_chars` characters, appending a marker when cut.
fn truncate_policy(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
