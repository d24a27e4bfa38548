//! Evidence aggregation: group by code, take the max confidence, apply the
//! threshold, attach provenance, rank.
//!
//! Ordering rules:
//! - within a code, the first evidence (in collection order) that reaches the
//!   maximum confidence wins and supplies justification and provenance
//! - across codes, higher confidence first; equal confidence sorts by code

pub mod aggregator;
pub mod provenance;
pub mod screening;

pub use aggregator::{AggregationOutcome, Aggregator};
pub use provenance::build_provenance;
pub use screening::{screen_evidence, Screened};
