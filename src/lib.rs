//! contract-extract: contract-driven, multi-engine text extraction
//!
//! Extracts structured values from free text according to a declarative
//! semantic contract, trying a prioritized sequence of extraction engines
//! until one succeeds.
//!
//! # Core Concepts
//!
//! - **Contracts**: what fields to extract and how to shape the output
//! - **Engines**: pattern, rule-based, NER, embedding, and LLM extractors
//! - **Pipeline**: normalization, validation, and confidence scoring
//! - **Escalation**: ordered, enable-flagged engine sequence with short-circuit
//!
//! # Example
//!
//! ```
//! use contract_extract::{default_engine_order, EngineType};
//!
//! let order = default_engine_order("date");
//! assert_eq!(order.first(), Some(&EngineType::Pattern));
//! ```

pub mod config;
pub mod contract;
pub mod engine;
pub mod escalation;
pub mod identifier;
pub mod pipeline;
pub mod storage;

pub use config::{ConfigError, RuntimeConfig, ServiceConfig};
pub use contract::{
    ContractError, EntityDescriptor, OutputShape, RedefinitionPolicy, SemanticContract,
    StructuredConstraint, Subentity,
};
pub use engine::{
    Engine, EngineConfig, EngineError, EngineFactory, EngineSettings, EngineSpec, EngineType,
    ExtractionService, FieldValues, HttpExtractionService, MockService, Rule, ServiceError,
};
pub use escalation::{
    default_engine_order, default_escalation_policy, AttemptOutcome, EscalationEntry,
    EscalationPolicy, EscalationReport, EscalationRunner,
};
pub use identifier::{FieldId, IdentifierLabelMap, TransformError};
pub use pipeline::{ContractPipeline, ExtractionResult};
pub use storage::{InMemoryStore, OpenStore, SqliteStore, StorageError, StorageResult, TemplateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
