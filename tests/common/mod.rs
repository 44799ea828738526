//! Shared fixtures for extraction scenario tests
//!
//! A day/month/year date contract with fixed field ids, and helpers to
//! seed a template store and build a runner around a mock service.

#![allow(dead_code)]

use contract_extract::{
    EngineConfig, EngineFactory, EngineSettings, EngineSpec, EntityDescriptor, EscalationRunner,
    MockService, SemanticContract, Subentity, TemplateStore,
};
use std::sync::Arc;

pub const NODE: &str = "node-birth-date";
pub const DAY: &str = "g_1a2b3c4d5e6f";
pub const MONTH: &str = "g_2b3c4d5e6f7a";
pub const YEAR: &str = "g_3c4d5e6f7a8b";

pub const DATE_PATTERN: &str =
    r"(?<g_1a2b3c4d5e6f>\d{1,2})[/-](?<g_2b3c4d5e6f7a>\d{1,2})[/-](?<g_3c4d5e6f7a8b>\d{2,4})";

/// Day/month/year contract labeled Giorno/Mese/Anno, with a two-digit
/// year rule.
pub fn date_contract() -> SemanticContract {
    SemanticContract::object(
        EntityDescriptor::new("Data di nascita", "date"),
        vec![
            Subentity::new(DAY, "Giorno", "day of month"),
            Subentity::new(MONTH, "Mese", "month").with_normalization("month numeric"),
            Subentity::new(YEAR, "Anno", "year").with_normalization("year always 4 digits"),
        ],
    )
}

pub fn pattern_config(pattern: &str) -> EngineConfig {
    EngineConfig::new(EngineSpec::Pattern {
        pattern: pattern.to_string(),
    })
}

pub fn llm_config() -> EngineConfig {
    EngineConfig::new(EngineSpec::Llm {
        prompt: "Extract day, month and year from: {text}".to_string(),
        schema: serde_json::Value::Null,
    })
}

/// Save the date contract and the given engine configs under [`NODE`].
pub fn seed<S: TemplateStore>(store: &S, engines: &[EngineConfig]) {
    store.save_contract(NODE, &date_contract()).unwrap();
    for e in engines {
        store.save_engine_config(NODE, e).unwrap();
    }
}

pub fn runner<S: TemplateStore + 'static>(store: S, service: Arc<MockService>) -> EscalationRunner {
    EscalationRunner::new(
        Arc::new(store),
        EngineFactory::with_service(EngineSettings::default(), service),
    )
}
