//! Extraction result: the terminal value returned to callers

use crate::engine::{EngineType, FieldValues};
use serde::{Deserialize, Serialize};

pub const ALL_ENGINES_FAILED: &str = "all extraction engines failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub values: FieldValues,
    pub has_match: bool,
    /// Engine that produced the values; `None` when no engine matched.
    pub source: Option<EngineType>,
    pub errors: Vec<String>,
    pub confidence: f32,
}

impl ExtractionResult {
    /// No enabled engine produced a match.
    pub fn exhausted() -> Self {
        Self::failure(ALL_ENGINES_FAILED)
    }

    /// A terminal failure with a single error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            values: FieldValues::new(),
            has_match: false,
            source: None,
            errors: vec![error.into()],
            confidence: 0.0,
        }
    }

    /// True when escalation may stop here.
    pub fn is_success(&self) -> bool {
        self.has_match && !self.values.is_empty()
    }
}
