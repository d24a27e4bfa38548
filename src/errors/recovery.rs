//! RecoveryAction enum: what to do when a pipeline operation fails.

use std::fmt;

use super::{InferenceError, RemoteModelError};

/// Recommended recovery action for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation (transient failure like a 503 or a timeout).
    Retry,
    /// Fall back to a degraded but functional alternative (no evidence).
    Fallback,
    /// Escalate to the caller; this error cannot be handled silently.
    Escalate,
    /// Ignore the error; the item is skipped and counted.
    Ignore,
}

impl RecoveryAction {
    /// Determine the recommended recovery action for an InferenceError.
    pub fn for_error(error: &InferenceError) -> Self {
        match error {
            // Transient remote failures: retry
            InferenceError::RemoteModel(e) if e.is_transient() => Self::Retry,
            InferenceError::RemoteModel(RemoteModelError::MissingCredentials { .. }) => {
                Self::Fallback
            }
            InferenceError::RemoteModel(_) => Self::Fallback,

            // A producer that blew up contributes nothing; the run goes on
            InferenceError::ProducerFailed { .. } => Self::Fallback,

            // One bad evidence item must not poison the aggregation
            InferenceError::MalformedEvidence { .. } => Self::Ignore,

            // Config errors: escalate (must be fixed by user)
            InferenceError::NoProducers => Self::Escalate,
            InferenceError::Config(_) => Self::Escalate,
            InferenceError::Toml(_) => Self::Escalate,

            // Data errors raised inside a producer only cost that producer's evidence.
            // Loaders return these directly, before any run starts.
            InferenceError::ReferenceData { .. } => Self::Fallback,
            InferenceError::Input(_) => Self::Fallback,
            InferenceError::Csv(_) => Self::Fallback,
            InferenceError::Io(_) => Self::Fallback,
            InferenceError::Serialization(_) => Self::Fallback,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Fallback => write!(f, "Fallback"),
            Self::Escalate => write!(f, "Escalate"),
            Self::Ignore => write!(f, "Ignore"),
        }
    }
}
