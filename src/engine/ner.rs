//! NER engine: delegates to the extraction service's entity recognizer

use super::service::{ExtractionService, ServiceResponse, NER_PATH};
use super::traits::Engine;
use super::types::{EngineType, FieldValues};
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct NerEngine {
    service: Arc<dyn ExtractionService>,
    /// field id → NER entity type
    entity_types: BTreeMap<String, String>,
}

impl NerEngine {
    pub fn new(service: Arc<dyn ExtractionService>, entity_types: BTreeMap<String, String>) -> Self {
        Self {
            service,
            entity_types,
        }
    }
}

#[async_trait]
impl Engine for NerEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Ner
    }

    async fn extract(&self, text: &str) -> FieldValues {
        let body = json!({
            "text": text,
            "entityTypes": self.entity_types,
        });

        let response = match self.service.post_json(NER_PATH, &body).await {
            Ok(raw) => ServiceResponse::parse(EngineType::Ner, raw),
            Err(e) => Err(e),
        };

        let candidates = match response {
            Ok(ServiceResponse::Ner(r)) => r.candidates,
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(engine = "ner", error = %e, "NER request failed");
                return FieldValues::new();
            }
        };

        // Earlier candidates take precedence for the same field.
        let mut values = FieldValues::new();
        for candidate in candidates {
            for (field, value) in candidate.value {
                let v = value.trim();
                if !v.is_empty() && !values.contains_key(&field) {
                    values.insert(field, v.to_string());
                }
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::service::{MockService, ServiceError};

    fn types() -> BTreeMap<String, String> {
        BTreeMap::from([("g_aaaaaaaaaaaa".to_string(), "PERSON".to_string())])
    }

    #[tokio::test]
    async fn merges_candidates_first_wins() {
        let service = Arc::new(MockService::new().with_response(
            NER_PATH,
            json!({"candidates": [
                {"entityType": "PERSON", "value": {"g_aaaaaaaaaaaa": " Mario Rossi "}},
                {"entityType": "PERSON", "value": {"g_aaaaaaaaaaaa": "Luigi", "g_bbbbbbbbbbbb": "Roma"}}
            ]}),
        ));
        let engine = NerEngine::new(service.clone(), types());
        let v = engine.extract("Mario Rossi vive a Roma").await;
        assert_eq!(v["g_aaaaaaaaaaaa"], "Mario Rossi");
        assert_eq!(v["g_bbbbbbbbbbbb"], "Roma");

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["entityTypes"]["g_aaaaaaaaaaaa"], "PERSON");
        assert_eq!(calls[0].1["text"], "Mario Rossi vive a Roma");
    }

    #[tokio::test]
    async fn service_failure_yields_empty_map() {
        let service = Arc::new(MockService::new().with_failure(
            NER_PATH,
            ServiceError::Status {
                status: 503,
                body: "down".into(),
            },
        ));
        let engine = NerEngine::new(service, types());
        assert!(engine.extract("Mario").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_yields_empty_map() {
        let service =
            Arc::new(MockService::new().with_response(NER_PATH, json!({"candidates": [1, 2]})));
        let engine = NerEngine::new(service, types());
        assert!(engine.extract("Mario").await.is_empty());
    }
}
