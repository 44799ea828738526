//! Extraction engines
//!
//! Every engine turns raw text into a map of field identifier → raw string
//! value. Pattern and rule-based engines run locally; NER, embedding, and
//! LLM engines make one round trip to the extraction service per call.

mod embedding;
mod factory;
mod llm;
mod ner;
mod pattern;
mod rule_based;
mod service;
mod traits;
mod types;

pub use embedding::EmbeddingEngine;
pub use factory::EngineFactory;
pub use llm::LlmEngine;
pub use ner::NerEngine;
pub use pattern::PatternEngine;
pub use rule_based::{CompiledRule, RuleBasedEngine};
pub use service::{
    EmbeddingMatch, EmbeddingResponse, ExtractionService, HttpExtractionService, LlmResponse,
    MockService, NerCandidate, NerResponse, ServiceError, ServiceResponse, EMBEDDING_PATH,
    LLM_PATH, NER_PATH,
};
pub use traits::{Engine, EngineError};
pub use types::{EngineConfig, EngineSettings, EngineSpec, EngineType, FieldValues, Rule};
