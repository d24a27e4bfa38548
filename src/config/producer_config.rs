//! Per-producer settings from the `[producers.*]` tables.

use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_unit_interval};
use crate::errors::{InferenceError, InferenceResult};

/// Settings for every built-in producer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProducersConfig {
    pub keyword: KeywordProducerConfig,
    pub remote_model: RemoteModelProducerConfig,
}

/// Keyword-overlap producer (local, deterministic).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeywordProducerConfig {
    pub enabled: bool,
    pub name: String,
    pub version: String,
    pub model_name: String,
    pub model_version: String,
    pub prompt_template_version: String,
    /// Minimum overlapping keywords before a code is claimed.
    pub min_matches: usize,
    pub base_confidence: f64,
    pub per_match_increment: f64,
    pub max_confidence: f64,
    /// Shorter tokens are ignored.
    pub min_keyword_len: usize,
    /// How many matched terms are quoted in the justification.
    pub max_listed_terms: usize,
}

impl Default for KeywordProducerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "mock_llm_reasoning".to_string(),
            version: "1.0".to_string(),
            model_name: "mock-keyword-matcher".to_string(),
            model_version: "1.0".to_string(),
            prompt_template_version: "1.0".to_string(),
            min_matches: 3,
            base_confidence: 0.5,
            per_match_increment: 0.1,
            max_confidence: 0.95,
            min_keyword_len: 3,
            max_listed_terms: 5,
        }
    }
}

impl KeywordProducerConfig {
    pub fn validate(&self) -> InferenceResult<()> {
        require_non_empty("producers.keyword.name", &self.name)?;
        require_non_empty("producers.keyword.version", &self.version)?;
        require_unit_interval("producers.keyword.base_confidence", self.base_confidence)?;
        require_unit_interval(
            "producers.keyword.per_match_increment",
            self.per_match_increment,
        )?;
        require_unit_interval("producers.keyword.max_confidence", self.max_confidence)?;
        if self.min_matches == 0 {
            return Err(InferenceError::Config(
                "producers.keyword.min_matches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remote chat-completion producer (candidate ranking + model validation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteModelProducerConfig {
    pub enabled: bool,
    pub name: String,
    pub version: String,
    /// Provider tag recorded in provenance (e.g. "groq").
    pub provider: String,
    /// OpenAI-compatible chat completions URL.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Candidate codes offered to the model.
    pub top_k_codes: usize,
    /// Candidates scoring below this are not offered.
    pub min_candidate_score: f64,
    /// Policy text beyond this many characters is truncated.
    pub max_policy_chars: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for RemoteModelProducerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "direct_match_groq".to_string(),
            version: "1.0".to_string(),
            provider: "groq".to_string(),
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            top_k_codes: 15,
            min_candidate_score: 0.1,
            max_policy_chars: 3000,
            temperature: 0.1,
            max_tokens: 2000,
            timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl RemoteModelProducerConfig {
    pub fn validate(&self) -> InferenceResult<()> {
        require_non_empty("producers.remote_model.name", &self.name)?;
        require_non_empty("producers.remote_model.version", &self.version)?;
        require_non_empty("producers.remote_model.provider", &self.provider)?;
        require_unit_interval(
            "producers.remote_model.min_candidate_score",
            self.min_candidate_score,
        )?;
        if self.top_k_codes == 0 {
            return Err(InferenceError::Config(
                "producers.remote_model.top_k_codes must be at least 1".to_string(),
            ));
        }
        if self.enabled {
            require_non_empty("producers.remote_model.endpoint", &self.endpoint)?;
            require_non_empty("producers.remote_model.model", &self.model)?;
        }
        Ok(())
    }
}
