//! Engine factory: builds runnable engines from stored configs

use super::embedding::EmbeddingEngine;
use super::llm::LlmEngine;
use super::ner::NerEngine;
use super::pattern::PatternEngine;
use super::rule_based::RuleBasedEngine;
use super::service::ExtractionService;
use super::traits::{Engine, EngineError};
use super::types::{EngineConfig, EngineSettings, EngineSpec, EngineType};
use std::sync::Arc;

/// Turns an [`EngineConfig`] into an [`Engine`], injecting settings and the
/// extraction service explicitly.
#[derive(Clone)]
pub struct EngineFactory {
    settings: EngineSettings,
    service: Option<Arc<dyn ExtractionService>>,
}

impl EngineFactory {
    /// A factory that can only build local (pattern, rule-based) engines.
    pub fn local(settings: EngineSettings) -> Self {
        Self {
            settings,
            service: None,
        }
    }

    pub fn with_service(settings: EngineSettings, service: Arc<dyn ExtractionService>) -> Self {
        Self {
            settings,
            service: Some(service),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn service_for(&self, engine: EngineType) -> Result<Arc<dyn ExtractionService>, EngineError> {
        self.service
            .clone()
            .ok_or(EngineError::MissingService(engine))
    }

    pub fn build(&self, config: &EngineConfig) -> Result<Box<dyn Engine>, EngineError> {
        let engine: Box<dyn Engine> = match config.spec() {
            EngineSpec::Pattern { pattern } => {
                if pattern.trim().is_empty() {
                    return Err(EngineError::InvalidConfig {
                        engine: EngineType::Pattern,
                        reason: "empty pattern".to_string(),
                    });
                }
                let engine = PatternEngine::new(pattern);
                if !engine.is_valid() {
                    return Err(EngineError::InvalidConfig {
                        engine: EngineType::Pattern,
                        reason: "pattern does not compile".to_string(),
                    });
                }
                Box::new(engine)
            }
            EngineSpec::RuleBased { rules } => {
                let engine = RuleBasedEngine::new(rules);
                if engine.rule_count() < rules.len() {
                    tracing::warn!(
                        configured = rules.len(),
                        usable = engine.rule_count(),
                        version = config.version(),
                        "rule-based engine dropped malformed rules"
                    );
                }
                Box::new(engine)
            }
            EngineSpec::Ner { entity_types } => Box::new(NerEngine::new(
                self.service_for(EngineType::Ner)?,
                entity_types.clone(),
            )),
            EngineSpec::Embedding {
                intent_ids,
                threshold,
                output_field,
                ..
            } => {
                let threshold = threshold.unwrap_or(self.settings.embedding_threshold);
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(EngineError::InvalidConfig {
                        engine: EngineType::Embedding,
                        reason: format!("threshold {} outside [0, 1]", threshold),
                    });
                }
                Box::new(EmbeddingEngine::new(
                    self.service_for(EngineType::Embedding)?,
                    intent_ids.clone(),
                    threshold,
                    output_field.clone(),
                ))
            }
            EngineSpec::Llm { prompt, schema } => {
                if prompt.trim().is_empty() {
                    return Err(EngineError::InvalidConfig {
                        engine: EngineType::Llm,
                        reason: "empty prompt".to_string(),
                    });
                }
                Box::new(LlmEngine::new(
                    self.service_for(EngineType::Llm)?,
                    prompt.clone(),
                    schema.clone(),
                    self.settings.clone(),
                ))
            }
        };

        tracing::debug!(
            engine = %config.engine_type(),
            version = config.version(),
            "engine built"
        );
        Ok(engine)
    }
}
