//! # hcpcs-inference
//!
//! Evidence aggregation and orchestration for HCPCS code inference over
//! coverage policy text. Producers emit evidence, the aggregator merges it
//! into one verdict per code, and the engine wraps the result in audit metadata.
//!
//! ## Modules
//! - `aggregation`: screening, max-confidence merge, threshold, ranking, provenance
//! - `config`: PipelineConfig, PipelineSettings, producer configs, validation
//! - `engine`: InferenceEngine, producer collection, run ids and input hashes
//! - `errors`: InferenceError, RemoteModelError, RecoveryAction, ErrorChain
//! - `input`: policy CSV loading
//! - `output`: per-row reports and run summaries
//! - `producers`: keyword matcher, remote chat model, producer factory
//! - `reference`: HCPCS code → description table
//! - `traits`: EvidenceProducer, ReferenceLookup
//! - `types`: Evidence, FinalCode, Provenance, AuditMetadata, PolicyInferenceResult

pub mod aggregation;
pub mod config;
pub mod engine;
pub mod errors;
pub mod input;
pub mod output;
pub mod producers;
pub mod reference;
pub mod traits;
pub mod types;

pub use aggregation::Aggregator;
pub use config::PipelineConfig;
pub use engine::InferenceEngine;
pub use errors::{InferenceError, InferenceResult};
pub use traits::{EvidenceProducer, ReferenceLookup};
pub use types::{Evidence, FinalCode, PolicyInferenceResult};
