//! Shared data structures for the pipeline (no logic beyond constructors).

pub mod audit;
pub mod evidence;
pub mod final_code;
pub mod inference_result;
pub mod metadata;
pub mod provenance;

pub use audit::{AuditMetadata, ProducerAudit, ProducerStatus};
pub use evidence::{Evidence, ModelInfo, HCPCS_CODE_TYPE};
pub use final_code::FinalCode;
pub use inference_result::PolicyInferenceResult;
pub use metadata::{Metadata, MetadataValue};
pub use provenance::{
    MethodProvenance, ModelProvenance, ProducerKind, Provenance, ReferenceProvenance,
};
