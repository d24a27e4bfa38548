//! Orchestration: run producers, aggregate, attach audit metadata.

pub mod audit;
pub mod collection;
pub mod inference_engine;

pub use audit::{current_timestamp, generate_run_id, hash_text};
pub use collection::{collect_evidence, ProducerReport};
pub use inference_engine::{InferenceEngine, RowResult};
