//! Engine descriptors and settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field identifier → raw or canonical string value.
pub type FieldValues = BTreeMap<String, String>;

/// The five extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    Pattern,
    RuleBased,
    Ner,
    Embedding,
    Llm,
}

impl EngineType {
    pub const ALL: [EngineType; 5] = [
        EngineType::Pattern,
        EngineType::RuleBased,
        EngineType::Ner,
        EngineType::Embedding,
        EngineType::Llm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineType::Pattern => "pattern",
            EngineType::RuleBased => "rule_based",
            EngineType::Ner => "ner",
            EngineType::Embedding => "embedding",
            EngineType::Llm => "llm",
        }
    }

    /// True for variants that call the extraction service.
    pub fn is_network_bound(&self) -> bool {
        matches!(self, EngineType::Ner | EngineType::Embedding | EngineType::Llm)
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown engine type: {}", s))
    }
}

/// A conditional rule: when `condition` matches, named groups captured by
/// `action` are merged into the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: String,
    pub action: String,
}

impl Rule {
    pub fn new(condition: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            action: action.into(),
        }
    }
}

fn default_output_field() -> String {
    "value".to_string()
}

/// Variant-specific engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineSpec {
    Pattern {
        pattern: String,
    },
    RuleBased {
        rules: Vec<Rule>,
    },
    Ner {
        /// field id → NER entity type understood by the service
        entity_types: BTreeMap<String, String>,
    },
    Embedding {
        intent_ids: Vec<String>,
        #[serde(default)]
        examples: Vec<String>,
        /// Falls back to `EngineSettings::embedding_threshold` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
        #[serde(default = "default_output_field")]
        output_field: String,
    },
    Llm {
        /// Prompt template; `{text}` is replaced with the input text.
        prompt: String,
        #[serde(default)]
        schema: serde_json::Value,
    },
}

impl EngineSpec {
    pub fn engine_type(&self) -> EngineType {
        match self {
            EngineSpec::Pattern { .. } => EngineType::Pattern,
            EngineSpec::RuleBased { .. } => EngineType::RuleBased,
            EngineSpec::Ner { .. } => EngineType::Ner,
            EngineSpec::Embedding { .. } => EngineType::Embedding,
            EngineSpec::Llm { .. } => EngineType::Llm,
        }
    }
}

fn first_version() -> u32 {
    1
}

/// A versioned engine configuration.
///
/// Immutable once constructed: [`revise`](Self::revise) produces the next
/// version instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten)]
    spec: EngineSpec,
    #[serde(default = "first_version")]
    version: u32,
    #[serde(default = "Utc::now")]
    generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provenance: Option<String>,
}

impl EngineConfig {
    pub fn new(spec: EngineSpec) -> Self {
        Self {
            spec,
            version: first_version(),
            generated_at: Utc::now(),
            provenance: None,
        }
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// The next version of this config with a new spec and timestamp.
    pub fn revise(&self, spec: EngineSpec) -> Self {
        Self {
            spec,
            version: self.version + 1,
            generated_at: Utc::now(),
            provenance: self.provenance.clone(),
        }
    }

    pub fn spec(&self) -> &EngineSpec {
        &self.spec
    }

    pub fn engine_type(&self) -> EngineType {
        self.spec.engine_type()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn provenance(&self) -> Option<&str> {
        self.provenance.as_deref()
    }
}

fn default_embedding_threshold() -> f32 {
    0.75
}

/// Settings handed to engines at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// AI provider forwarded with LLM requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model name forwarded with LLM requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_embedding_threshold")]
    pub embedding_threshold: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            embedding_threshold: default_embedding_threshold(),
        }
    }
}
