//! Chat-completion transport: the seam between the remote producer and the network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RemoteModelProducerConfig;
use crate::errors::RemoteModelError;

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Model reply text plus token accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: TokenUsage,
}

/// Anything that can answer a chat completion request.
pub trait CompletionTransport: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, RemoteModelError>;
}

// ============================================================================
// HTTP transport
// ============================================================================

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Deserialize)]
struct WireErrorDetail {
    message: String,
}

/// Blocking reqwest transport for OpenAI-compatible endpoints (Groq, OpenAI, ...).
pub struct HttpCompletionTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout_secs: u64,
}

impl HttpCompletionTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, RemoteModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RemoteModelError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_key_env: api_key_env.into(),
            timeout_secs,
        })
    }

    /// Build from config, reading the API key from `config.api_key_env`.
    /// A missing key is not an error here; requests degrade instead.
    pub fn from_config(config: &RemoteModelProducerConfig) -> Result<Self, RemoteModelError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(
            config.endpoint.clone(),
            api_key,
            config.api_key_env.clone(),
            config.timeout_secs,
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

impl CompletionTransport for HttpCompletionTransport {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, RemoteModelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteModelError::MissingCredentials {
                env_var: self.api_key_env.clone(),
            })?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteModelError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    RemoteModelError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| RemoteModelError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<WireError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(RemoteModelError::Status {
                status: status.as_u16(),
                message,
            });
        }

        parse_wire_response(&body)
    }
}

fn parse_wire_response(body: &str) -> Result<ChatCompletion, RemoteModelError> {
    let parsed: WireResponse = serde_json::from_str(body)
        .map_err(|e| RemoteModelError::MalformedResponse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| RemoteModelError::MalformedResponse("no choices in response".to_string()))?;

    Ok(ChatCompletion {
        content: content.trim().to_string(),
        usage: parsed.usage.unwrap_or_default(),
    })
}
