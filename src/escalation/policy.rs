//! Escalation policy

use crate::engine::EngineType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationEntry {
    #[serde(rename = "type")]
    pub engine_type: EngineType,
    pub priority: i32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl EscalationEntry {
    pub fn new(engine_type: EngineType, priority: i32) -> Self {
        Self {
            engine_type,
            priority,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered, enable-flagged engine list for one node.
///
/// Priorities need not be contiguous; ties keep list order. A policy with
/// no enabled entry is valid and simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    pub node_id: String,
    #[serde(default)]
    pub engines: Vec<EscalationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_engine: Option<EngineType>,
}

impl EscalationPolicy {
    pub fn new(node_id: impl Into<String>, engines: Vec<EscalationEntry>) -> Self {
        Self {
            node_id: node_id.into(),
            engines,
            default_engine: None,
        }
    }

    /// Enabled engines sorted by ascending priority, ties in list order.
    pub fn ordered_enabled(&self) -> Vec<EngineType> {
        let mut enabled: Vec<&EscalationEntry> = self.engines.iter().filter(|e| e.enabled).collect();
        // sort_by_key is stable
        enabled.sort_by_key(|e| e.priority);
        enabled.into_iter().map(|e| e.engine_type).collect()
    }

    pub fn has_enabled_engines(&self) -> bool {
        self.engines.iter().any(|e| e.enabled)
    }
}
