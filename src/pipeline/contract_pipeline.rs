//! Single-engine pipeline

use super::confidence::score_confidence;
use super::normalize::normalize_values;
use super::result::ExtractionResult;
use super::validate::validate;
use crate::contract::SemanticContract;
use crate::engine::{Engine, EngineType, FieldValues};

/// Runs one engine's output through the contract's stages.
pub struct ContractPipeline<'a> {
    contract: &'a SemanticContract,
}

impl<'a> ContractPipeline<'a> {
    pub fn new(contract: &'a SemanticContract) -> Self {
        Self { contract }
    }

    /// Normalize, validate, constrain, and score raw engine output.
    pub fn process(&self, source: EngineType, raw: &FieldValues) -> ExtractionResult {
        let normalized = normalize_values(self.contract, raw);
        let errors = validate(self.contract, &normalized);
        let valid = errors.is_empty();
        let values = self.constrain(normalized);
        let confidence = score_confidence(self.contract, &values, valid);

        tracing::debug!(
            engine = %source,
            fields = values.len(),
            errors = errors.len(),
            confidence,
            "pipeline processed engine output"
        );

        ExtractionResult {
            values,
            has_match: valid,
            source: Some(source),
            errors,
            confidence,
        }
    }

    /// Run `engine` on `text` and process its output.
    pub async fn run(&self, engine: &dyn Engine, text: &str) -> ExtractionResult {
        let raw = engine.extract(text).await;
        self.process(engine.engine_type(), &raw)
    }

    /// Contract-level constraint shaping. Values pass through unchanged;
    /// no constraint class reshapes output yet.
    fn constrain(&self, values: FieldValues) -> FieldValues {
        values
    }
}
