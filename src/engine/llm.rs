//! LLM engine: schema-guided extraction via the language-model endpoint

use super::service::{ExtractionService, ServiceResponse, LLM_PATH};
use super::traits::Engine;
use super::types::{EngineSettings, EngineType, FieldValues};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct LlmEngine {
    service: Arc<dyn ExtractionService>,
    prompt: String,
    schema: Value,
    settings: EngineSettings,
}

impl LlmEngine {
    pub fn new(
        service: Arc<dyn ExtractionService>,
        prompt: impl Into<String>,
        schema: Value,
        settings: EngineSettings,
    ) -> Self {
        Self {
            service,
            prompt: prompt.into(),
            schema,
            settings,
        }
    }

    fn build_request(&self, text: &str) -> Value {
        let schema = if self.schema.is_null() {
            json!({})
        } else {
            self.schema.clone()
        };
        let mut body = json!({
            "text": text,
            "prompt": self.prompt.replace("{text}", text),
            "schema": schema,
        });
        if let Some(provider) = &self.settings.provider {
            body["provider"] = Value::String(provider.clone());
        }
        if let Some(model) = &self.settings.model {
            body["model"] = Value::String(model.clone());
        }
        body
    }
}

/// Scalar JSON values as strings; nulls and containers are dropped.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[async_trait]
impl Engine for LlmEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Llm
    }

    async fn extract(&self, text: &str) -> FieldValues {
        let body = self.build_request(text);

        let response = match self.service.post_json(LLM_PATH, &body).await {
            Ok(raw) => ServiceResponse::parse(EngineType::Llm, raw),
            Err(e) => Err(e),
        };

        match response {
            Ok(ServiceResponse::Llm(r)) => r
                .values
                .iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .filter(|(_, v)| !v.is_empty())
                .collect(),
            Ok(_) => FieldValues::new(),
            Err(e) => {
                tracing::warn!(engine = "llm", error = %e, "LLM extraction failed");
                FieldValues::new()
            }
        }
    }
}
