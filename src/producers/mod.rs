//! Built-in evidence producers and the config-driven factory that registers them.

mod keyword_match;
pub mod keywords;
mod outcome;
pub mod remote_model;

pub use keyword_match::KeywordMatchProducer;
pub use outcome::{EmptyReason, ProducerOutcome};
pub use remote_model::RemoteModelProducer;

use std::sync::Arc;

use tracing::info;

use crate::config::ProducersConfig;
use crate::errors::{InferenceError, InferenceResult};
use crate::reference::HcpcsReference;
use crate::traits::EvidenceProducer;

/// Instantiate every enabled producer, keyword matcher first.
///
/// Returns an empty vector when nothing is enabled; the engine rejects that.
pub fn build_producers(
    config: &ProducersConfig,
    reference: &Arc<HcpcsReference>,
) -> InferenceResult<Vec<Box<dyn EvidenceProducer>>> {
    let mut producers: Vec<Box<dyn EvidenceProducer>> = Vec::new();

    if config.keyword.enabled {
        config.keyword.validate()?;
        producers.push(Box::new(KeywordMatchProducer::new(
            config.keyword.clone(),
            reference,
        )));
    }

    if config.remote_model.enabled {
        config.remote_model.validate()?;
        let producer = RemoteModelProducer::with_http(config.remote_model.clone(), reference)
            .map_err(InferenceError::from)?;
        producers.push(Box::new(producer));
    }

    info!(
        count = producers.len(),
        names = ?producers.iter().map(|p| p.name()).collect::<Vec<_>>(),
        "Evidence producers registered"
    );

    Ok(producers)
}
