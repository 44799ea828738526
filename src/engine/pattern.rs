//! Pattern engine: named-group regex extraction

use super::traits::Engine;
use super::types::{EngineType, FieldValues};
use async_trait::async_trait;
use regex::{Captures, Regex};

/// Collect named groups from a match, trimmed, dropping empty values.
pub(crate) fn named_groups(regex: &Regex, caps: &Captures<'_>) -> FieldValues {
    let mut values = FieldValues::new();
    for name in regex.capture_names().flatten() {
        if let Some(m) = caps.name(name) {
            let v = m.as_str().trim();
            if !v.is_empty() {
                values.insert(name.to_string(), v.to_string());
            }
        }
    }
    values
}

/// Compile a pattern, logging and returning `None` when it is malformed.
pub(crate) fn compile_logged(pattern: &str, engine: EngineType) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(%engine, error = %e, "malformed pattern, engine will not match");
            None
        }
    }
}

/// Extracts named groups from the longest non-overlapping match.
pub struct PatternEngine {
    regex: Option<Regex>,
}

impl PatternEngine {
    pub fn new(pattern: &str) -> Self {
        Self {
            regex: compile_logged(pattern, EngineType::Pattern),
        }
    }

    /// False if the configured pattern failed to compile.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn extract_sync(&self, text: &str) -> FieldValues {
        let Some(regex) = &self.regex else {
            return FieldValues::new();
        };

        // Longest match wins; `>` keeps the first of equal-length matches.
        let mut best: Option<Captures<'_>> = None;
        for caps in regex.captures_iter(text) {
            let len = caps.get(0).map_or(0, |m| m.len());
            let best_len = best.as_ref().and_then(|b| b.get(0)).map_or(0, |m| m.len());
            if best.is_none() || len > best_len {
                best = Some(caps);
            }
        }

        match best.or_else(|| regex.captures(text)) {
            Some(caps) => named_groups(regex, &caps),
            None => FieldValues::new(),
        }
    }
}

#[async_trait]
impl Engine for PatternEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Pattern
    }

    async fn extract(&self, text: &str) -> FieldValues {
        self.extract_sync(text)
    }
}
