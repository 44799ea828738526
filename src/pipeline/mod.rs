//! Contract pipeline
//!
//! Turns one engine's raw output into a canonical extraction result:
//! normalize → validate → constrain → score confidence.

mod confidence;
mod contract_pipeline;
mod normalize;
mod result;
mod validate;

pub use confidence::{score_confidence, thresholds};
pub use contract_pipeline::ContractPipeline;
pub use normalize::{normalize_values, NormalizationRule};
pub use result::ExtractionResult;
pub use validate::validate;
