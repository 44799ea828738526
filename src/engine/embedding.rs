//! Embedding engine: intent classification by embedding similarity

use super::service::{ExtractionService, ServiceResponse, EMBEDDING_PATH};
use super::traits::Engine;
use super::types::{EngineType, FieldValues};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Accepts the service's best intent when its score reaches the threshold,
/// writing it under a single output field.
pub struct EmbeddingEngine {
    service: Arc<dyn ExtractionService>,
    intent_ids: Vec<String>,
    threshold: f32,
    output_field: String,
}

impl EmbeddingEngine {
    pub fn new(
        service: Arc<dyn ExtractionService>,
        intent_ids: Vec<String>,
        threshold: f32,
        output_field: impl Into<String>,
    ) -> Self {
        Self {
            service,
            intent_ids,
            threshold,
            output_field: output_field.into(),
        }
    }
}

#[async_trait]
impl Engine for EmbeddingEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Embedding
    }

    async fn extract(&self, text: &str) -> FieldValues {
        let body = json!({
            "text": text,
            "intentIds": self.intent_ids,
        });

        let response = match self.service.post_json(EMBEDDING_PATH, &body).await {
            Ok(raw) => ServiceResponse::parse(EngineType::Embedding, raw),
            Err(e) => Err(e),
        };

        let best = match response {
            Ok(ServiceResponse::Embedding(r)) => r.best,
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(engine = "embedding", error = %e, "embedding classification failed");
                return FieldValues::new();
            }
        };

        let mut values = FieldValues::new();
        match best {
            Some(m) if m.score >= self.threshold => {
                let value = m
                    .intent_id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| text.trim().to_string());
                if !value.is_empty() {
                    values.insert(self.output_field.clone(), value);
                }
            }
            Some(m) => {
                tracing::debug!(score = m.score, threshold = self.threshold, "embedding below threshold");
            }
            None => {}
        }
        values
    }
}
