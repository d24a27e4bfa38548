//! Pipeline configuration: thresholds, version strings, producer settings.
//!
//! Loaded from TOML with `#[serde(default)]` everywhere, so a partial file only
//! overrides what it names. Injected into the engine and producers at
//! construction; nothing here is global.

pub mod pipeline_settings;
pub mod producer_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use pipeline_settings::{ExecutionMode, PipelineSettings};
pub use producer_config::{KeywordProducerConfig, ProducersConfig, RemoteModelProducerConfig};

use crate::errors::{InferenceError, InferenceResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub pipeline: PipelineSettings,
    pub producers: ProducersConfig,
}

impl PipelineConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> InferenceResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> InferenceResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> InferenceResult<()> {
        self.pipeline.validate()?;
        self.producers.keyword.validate()?;
        self.producers.remote_model.validate()?;
        Ok(())
    }
}

pub(crate) fn require_unit_interval(field: &str, value: f64) -> InferenceResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(InferenceError::Config(format!(
            "{field} must be within [0.0, 1.0], got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> InferenceResult<()> {
    if value.trim().is_empty() {
        return Err(InferenceError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}
