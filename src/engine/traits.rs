//! Engine trait: the capability every extraction strategy implements

use super::types::{EngineType, FieldValues};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while turning a config into a runnable engine.
///
/// Extraction itself never fails: engines log problems and return an empty
/// map, which the pipeline treats as a non-match.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no engine configured for {0}")]
    NotConfigured(EngineType),

    #[error("{0} engine requires an extraction service, but none is configured")]
    MissingService(EngineType),

    #[error("invalid {engine} config: {reason}")]
    InvalidConfig { engine: EngineType, reason: String },
}

/// Extract raw field values from text.
///
/// Network-bound variants suspend on one outbound call; local variants
/// complete without suspending.
#[async_trait]
pub trait Engine: Send + Sync {
    fn engine_type(&self) -> EngineType;

    async fn extract(&self, text: &str) -> FieldValues;
}
