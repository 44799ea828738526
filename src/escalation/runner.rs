//! Escalation runner
//!
//! Tries engines strictly one at a time: a higher-priority match suppresses
//! every lower-priority engine, and network-bound engines are never invoked
//! speculatively.

use super::advisor::default_escalation_policy;
use super::policy::EscalationPolicy;
use crate::contract::SemanticContract;
use crate::engine::{Engine, EngineError, EngineFactory, EngineType};
use crate::pipeline::{ContractPipeline, ExtractionResult};
use crate::storage::TemplateStore;
use std::sync::Arc;

/// What happened when one engine was tried.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Pipeline matched with non-empty values; escalation stopped here.
    Matched,
    /// Engine ran but the pipeline did not produce a usable match.
    NoMatch { errors: Vec<String> },
    /// Engine could not be built or loaded.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineAttempt {
    pub engine: EngineType,
    pub outcome: AttemptOutcome,
}

/// The final result plus the trail of attempts that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationReport {
    pub result: ExtractionResult,
    pub attempts: Vec<EngineAttempt>,
}

/// Runs a node's escalation policy against text.
pub struct EscalationRunner {
    store: Arc<dyn TemplateStore>,
    factory: EngineFactory,
}

impl EscalationRunner {
    pub fn new(store: Arc<dyn TemplateStore>, factory: EngineFactory) -> Self {
        Self { store, factory }
    }

    /// Load the node's contract and policy, then escalate.
    ///
    /// Falls back to the default policy for the contract's entity type when
    /// none is stored. Never fails: problems surface as a failed result.
    pub async fn extract(&self, node_id: &str, text: &str) -> ExtractionResult {
        let contract = match self.store.load_contract(node_id) {
            Ok(Some(c)) => c,
            Ok(None) => {
                tracing::warn!(node_id, "no contract stored for node");
                return ExtractionResult::failure(format!("no contract for node {}", node_id));
            }
            Err(e) => {
                tracing::warn!(node_id, error = %e, "failed to load contract");
                return ExtractionResult::failure(format!("failed to load contract: {}", e));
            }
        };

        let policy = match self.store.load_escalation_policy(node_id) {
            Ok(Some(p)) => p,
            Ok(None) => {
                tracing::debug!(node_id, entity_type = %contract.entity.entity_type, "using default escalation policy");
                default_escalation_policy(node_id, &contract.entity.entity_type)
            }
            Err(e) => {
                tracing::warn!(node_id, error = %e, "failed to load escalation policy, using default");
                default_escalation_policy(node_id, &contract.entity.entity_type)
            }
        };

        self.escalate(&contract, &policy, text).await.result
    }

    fn resolve(&self, node_id: &str, engine_type: EngineType) -> Result<Box<dyn Engine>, String> {
        let config = self
            .store
            .load_engine_config(node_id, engine_type)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| EngineError::NotConfigured(engine_type).to_string())?;
        self.factory.build(&config).map_err(|e| e.to_string())
    }

    /// Try each enabled engine in priority order; return the first match.
    pub async fn escalate(
        &self,
        contract: &SemanticContract,
        policy: &EscalationPolicy,
        text: &str,
    ) -> EscalationReport {
        let node_id = policy.node_id.as_str();
        let pipeline = ContractPipeline::new(contract);
        let mut attempts = Vec::new();

        for engine_type in policy.ordered_enabled() {
            let engine = match self.resolve(node_id, engine_type) {
                Ok(engine) => engine,
                Err(reason) => {
                    tracing::warn!(node_id, engine = %engine_type, %reason, "engine unavailable, escalating");
                    attempts.push(EngineAttempt {
                        engine: engine_type,
                        outcome: AttemptOutcome::Unavailable { reason },
                    });
                    continue;
                }
            };

            if engine_type.is_network_bound() {
                tracing::debug!(node_id, engine = %engine_type, "calling extraction service");
            }
            let result = pipeline.run(engine.as_ref(), text).await;
            if result.is_success() {
                tracing::info!(node_id, engine = %engine_type, confidence = result.confidence, "extraction matched");
                attempts.push(EngineAttempt {
                    engine: engine_type,
                    outcome: AttemptOutcome::Matched,
                });
                return EscalationReport { result, attempts };
            }

            tracing::debug!(node_id, engine = %engine_type, errors = ?result.errors, "no match, escalating");
            attempts.push(EngineAttempt {
                engine: engine_type,
                outcome: AttemptOutcome::NoMatch {
                    errors: result.errors,
                },
            });
        }

        tracing::warn!(node_id, attempted = attempts.len(), "all extraction engines failed");
        EscalationReport {
            result: ExtractionResult::exhausted(),
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{EntityDescriptor, Subentity};
    use crate::engine::{
        EngineConfig, EngineSettings, EngineSpec, MockService, LLM_PATH, NER_PATH,
    };
    use crate::escalation::EscalationEntry;
    use crate::pipeline::ExtractionResult;
    use crate::storage::InMemoryStore;
    use serde_json::json;

    const YEAR: &str = "g_3c4d5e6f7a8b";

    fn year_contract() -> SemanticContract {
        SemanticContract::object(
            EntityDescriptor::new("Anno", "date"),
            vec![Subentity::new(YEAR, "Anno", "year").with_normalization("year always 4 digits")],
        )
    }

    fn store_with(configs: Vec<EngineConfig>) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store.save_contract("n1", &year_contract()).unwrap();
        for c in configs {
            store.save_engine_config("n1", &c).unwrap();
        }
        store
    }

    fn pattern(p: &str) -> EngineConfig {
        EngineConfig::new(EngineSpec::Pattern { pattern: p.into() })
    }

    fn llm() -> EngineConfig {
        EngineConfig::new(EngineSpec::Llm {
            prompt: "year?".into(),
            schema: serde_json::Value::Null,
        })
    }

    #[tokio::test]
    async fn first_match_short_circuits() {
        let service = Arc::new(
            MockService::new().with_response(LLM_PATH, json!({"values": {YEAR: "1999"}})),
        );
        let store = store_with(vec![pattern(r"(?<g_3c4d5e6f7a8b>\d{4})"), llm()]);
        let runner = EscalationRunner::new(
            store,
            EngineFactory::with_service(EngineSettings::default(), service.clone()),
        );
        let policy = EscalationPolicy::new(
            "n1",
            vec![
                EscalationEntry::new(EngineType::Llm, 2),
                EscalationEntry::new(EngineType::Pattern, 1),
            ],
        );

        let report = runner.escalate(&year_contract(), &policy, "anno 2021").await;
        assert_eq!(report.result.source, Some(EngineType::Pattern));
        assert_eq!(report.result.values[YEAR], "2021");
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn escalates_past_non_match_and_missing_engines() {
        let service = Arc::new(
            MockService::new().with_response(LLM_PATH, json!({"values": {YEAR: "99"}})),
        );
        let store = store_with(vec![pattern(r"(?<g_3c4d5e6f7a8b>\d{4})"), llm()]);
        let runner = EscalationRunner::new(
            store,
            EngineFactory::with_service(EngineSettings::default(), service.clone()),
        );
        let policy = EscalationPolicy::new(
            "n1",
            vec![
                EscalationEntry::new(EngineType::Pattern, 1),
                EscalationEntry::new(EngineType::RuleBased, 2),
                EscalationEntry::new(EngineType::Llm, 3),
            ],
        );

        let report = runner.escalate(&year_contract(), &policy, "l'anno novantanove").await;
        assert_eq!(report.result.source, Some(EngineType::Llm));
        assert_eq!(report.result.values[YEAR], "1999");
        assert!(matches!(report.attempts[0].outcome, AttemptOutcome::NoMatch { .. }));
        assert!(matches!(report.attempts[1].outcome, AttemptOutcome::Unavailable { .. }));
        assert_eq!(report.attempts[2].outcome, AttemptOutcome::Matched);
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn network_engine_without_service_is_skipped() {
        let store = store_with(vec![llm()]);
        let runner = EscalationRunner::new(store, EngineFactory::local(EngineSettings::default()));
        let policy = EscalationPolicy::new("n1", vec![EscalationEntry::new(EngineType::Llm, 1)]);
        let report = runner.escalate(&year_contract(), &policy, "1999").await;
        assert_eq!(report.result, ExtractionResult::exhausted());
        assert!(matches!(
            &report.attempts[0].outcome,
            AttemptOutcome::Unavailable { reason } if reason.contains("requires an extraction service")
        ));
    }

    #[tokio::test]
    async fn extract_uses_default_policy_when_none_stored() {
        let service = Arc::new(MockService::new().with_response(
            NER_PATH,
            json!({"candidates": [{"entityType": "DATE", "value": {YEAR: "2001"}}]}),
        ));
        let store = store_with(vec![EngineConfig::new(EngineSpec::Ner {
            entity_types: [(YEAR.to_string(), "DATE".to_string())].into(),
        })]);
        let runner = EscalationRunner::new(
            store,
            EngineFactory::with_service(EngineSettings::default(), service),
        );
        // "date" → pattern, rule_based, ner, llm; only ner is configured.
        let result = runner.extract("n1", "nel duemilauno").await;
        assert_eq!(result.source, Some(EngineType::Ner));
        assert_eq!(result.values[YEAR], "2001");
    }

    #[tokio::test]
    async fn extract_without_contract_fails_cleanly() {
        let runner = EscalationRunner::new(
            Arc::new(InMemoryStore::new()),
            EngineFactory::local(EngineSettings::default()),
        );
        let result = runner.extract("missing", "text").await;
        assert!(!result.has_match);
        assert_eq!(result.source, None);
        assert_eq!(result.errors, vec!["no contract for node missing"]);
    }
}
