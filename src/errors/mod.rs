//! Error types for the inference pipeline (thiserror).

mod chain;
mod inference_error;
mod recovery;

pub use chain::{ChainedError, ErrorChain};
pub use inference_error::{InferenceError, InferenceResult, RemoteModelError};
pub use recovery::RecoveryAction;
