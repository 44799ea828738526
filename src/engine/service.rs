//! Extraction service client: the network side of NER, embedding, and LLM engines
//!
//! Defines the client trait and the typed response union. Two
//! implementations:
//! - `HttpExtractionService`: JSON over HTTP via reqwest (production)
//! - `MockService`: returns preconfigured bodies per endpoint (testing)

use super::types::EngineType;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

pub const NER_PATH: &str = "/api/ner/extract";
pub const EMBEDDING_PATH: &str = "/api/intents/classify-embedding";
pub const LLM_PATH: &str = "/api/nlp/llm-extract";

/// Errors from extraction service calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("no response configured for {0}")]
    NotFound(String),
}

/// Client trait for the extraction service.
///
/// Abstracts over transport so engines don't depend on how the service is
/// reached.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// POST a JSON body to `path` and return the JSON response body.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NerCandidate {
    #[serde(rename = "entityType", default)]
    pub entity_type: String,
    #[serde(default)]
    pub value: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NerResponse {
    #[serde(default)]
    pub candidates: Vec<NerCandidate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbeddingMatch {
    pub score: f32,
    #[serde(rename = "intentId", default)]
    pub intent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub best: Option<EmbeddingMatch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub values: serde_json::Map<String, Value>,
}

/// Typed response body, one variant per network-bound engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    Ner(NerResponse),
    Embedding(EmbeddingResponse),
    Llm(LlmResponse),
}

impl ServiceResponse {
    /// Parse a raw body according to the engine that requested it.
    pub fn parse(engine: EngineType, body: Value) -> Result<Self, ServiceError> {
        let parsed = match engine {
            EngineType::Ner => serde_json::from_value(body).map(ServiceResponse::Ner),
            EngineType::Embedding => serde_json::from_value(body).map(ServiceResponse::Embedding),
            EngineType::Llm => serde_json::from_value(body).map(ServiceResponse::Llm),
            local => {
                return Err(ServiceError::Parse(format!(
                    "{} engine has no service response",
                    local
                )))
            }
        };
        parsed.map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

/// HTTP client for the extraction service.
pub struct HttpExtractionService {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpExtractionService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ServiceError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Transport(format!("request timed out after {}s", self.timeout_secs))
            } else {
                ServiceError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

/// Mock service for testing: returns preconfigured bodies per path and
/// records every request.
#[derive(Default)]
pub struct MockService {
    responses: HashMap<String, Result<Value, ServiceError>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response body for an endpoint path.
    pub fn with_response(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), Ok(body));
        self
    }

    /// Register a failure for an endpoint path.
    pub fn with_failure(mut self, path: impl Into<String>, error: ServiceError) -> Self {
        self.responses.insert(path.into(), Err(error));
        self
    }

    /// Requests received so far, as (path, body).
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ExtractionService for MockService {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ServiceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((path.to_string(), body.clone()));
        }
        match self.responses.get(path) {
            Some(result) => result.clone(),
            None => Err(ServiceError::NotFound(path.to_string())),
        }
    }
}
