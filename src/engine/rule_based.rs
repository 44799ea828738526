//! Rule-based engine: conditional patterns evaluated in order

use super::pattern::{compile_logged, named_groups};
use super::traits::Engine;
use super::types::{EngineType, FieldValues, Rule};
use async_trait::async_trait;
use regex::Regex;

/// A rule with both patterns compiled.
pub struct CompiledRule {
    condition: Regex,
    action: Regex,
}

/// Applies each rule whose condition matches; later rules overwrite
/// earlier values for the same field.
pub struct RuleBasedEngine {
    rules: Vec<CompiledRule>,
}

impl RuleBasedEngine {
    /// Compile rules, skipping (and logging) any with a malformed pattern.
    pub fn new(rules: &[Rule]) -> Self {
        let compiled = rules
            .iter()
            .filter_map(|r| {
                let condition = compile_logged(&r.condition, EngineType::RuleBased)?;
                let action = compile_logged(&r.action, EngineType::RuleBased)?;
                Some(CompiledRule { condition, action })
            })
            .collect();
        Self { rules: compiled }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn extract_sync(&self, text: &str) -> FieldValues {
        let mut values = FieldValues::new();
        for rule in &self.rules {
            if !rule.condition.is_match(text) {
                continue;
            }
            if let Some(caps) = rule.action.captures(text) {
                values.extend(named_groups(&rule.action, &caps));
            }
        }
        values
    }
}

#[async_trait]
impl Engine for RuleBasedEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::RuleBased
    }

    async fn extract(&self, text: &str) -> FieldValues {
        self.extract_sync(text)
    }
}
