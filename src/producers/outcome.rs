//! ProducerOutcome: typed result of one producer invocation.

use crate::errors::InferenceError;
use crate::types::{Evidence, ProducerStatus};

/// Why a producer returned no evidence without anything going wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Input text was empty or whitespace-only.
    BlankInput,
    /// No keywords survived extraction.
    NoKeywords,
    /// Nothing matched strongly enough to claim.
    NoMatches,
    /// The remote model judged none of the candidates relevant.
    NoneConfirmed,
}

impl EmptyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlankInput => "blank_input",
            Self::NoKeywords => "no_keywords",
            Self::NoMatches => "no_matches",
            Self::NoneConfirmed => "none_confirmed",
        }
    }
}

/// Result of running a producer on one policy text.
#[derive(Debug)]
pub enum ProducerOutcome {
    /// At least one evidence item.
    Produced(Vec<Evidence>),
    /// Ran cleanly, nothing to claim.
    Empty(EmptyReason),
    /// Expected failure mode; contributes no evidence.
    Degraded(InferenceError),
    /// Unexpected failure. The engine decides via `RecoveryAction`.
    Failed(InferenceError),
}

impl ProducerOutcome {
    /// Wrap evidence, collapsing an empty vector into `Empty(reason)`.
    pub fn from_evidence(evidence: Vec<Evidence>, if_empty: EmptyReason) -> Self {
        if evidence.is_empty() {
            Self::Empty(if_empty)
        } else {
            Self::Produced(evidence)
        }
    }

    pub fn evidence(&self) -> &[Evidence] {
        match self {
            Self::Produced(evidence) => evidence,
            _ => &[],
        }
    }

    pub fn into_evidence(self) -> Vec<Evidence> {
        match self {
            Self::Produced(evidence) => evidence,
            Self::Empty(_) | Self::Degraded(_) | Self::Failed(_) => Vec::new(),
        }
    }

    /// Audit status for this outcome.
    pub fn status(&self) -> ProducerStatus {
        match self {
            Self::Produced(_) => ProducerStatus::Produced,
            Self::Empty(reason) => ProducerStatus::Empty {
                reason: reason.as_str().to_string(),
            },
            Self::Degraded(e) => ProducerStatus::Degraded {
                reason: e.to_string(),
            },
            Self::Failed(e) => ProducerStatus::Failed {
                reason: e.to_string(),
            },
        }
    }
}
