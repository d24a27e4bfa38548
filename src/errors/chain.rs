//! ErrorChain: accumulates non-fatal errors so a loop can finish and report them together.

use super::InferenceError;

/// A non-fatal error tagged with the step at which it occurred.
#[derive(Debug)]
pub struct ChainedError {
    /// Position in the loop (evidence index, producer index, ...).
    pub step: usize,
    pub error: InferenceError,
}

/// Ordered collection of non-fatal errors.
#[derive(Debug, Default)]
pub struct ErrorChain {
    errors: Vec<ChainedError>,
}

impl ErrorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: usize, error: InferenceError) {
        self.errors.push(ChainedError { step, error });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainedError> {
        self.errors.iter()
    }

    /// Log every accumulated error as a batch under one summary line.
    pub fn log_summary(&self, context: &str) {
        if self.errors.is_empty() {
            return;
        }
        tracing::warn!(
            error_count = self.errors.len(),
            "{} completed with {} non-fatal errors",
            context,
            self.errors.len()
        );
        for chained in &self.errors {
            tracing::warn!(
                step = chained.step,
                error = %chained.error,
                "{} error at step {}",
                context,
                chained.step
            );
        }
    }
}
