use thiserror::Error;

/// Top-level error type for the inference pipeline.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("No evidence producers registered")]
    NoProducers,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference data error for {path}: {reason}")]
    ReferenceData { path: String, reason: String },

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Producer {producer} failed: {reason}")]
    ProducerFailed { producer: String, reason: String },

    #[error("Malformed evidence from {producer} for code '{code}': {reason}")]
    MalformedEvidence {
        producer: String,
        code: String,
        reason: String,
    },

    #[error("Remote model error: {0}")]
    RemoteModel(#[from] RemoteModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

/// Failures talking to a remote chat-completion model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteModelError {
    #[error("API key not configured (env: {env_var})")]
    MissingCredentials { env_var: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl RemoteModelError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MissingCredentials { .. } | Self::MalformedResponse(_) => false,
        }
    }
}
