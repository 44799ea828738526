//! In-memory template store

use super::traits::{StorageResult, TemplateKey, TemplateStore};
use dashmap::DashMap;

/// Template store backed by a concurrent hash map. Nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<(String, TemplateKey), String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TemplateStore for InMemoryStore {
    fn get_raw(&self, node_id: &str, key: TemplateKey) -> StorageResult<Option<String>> {
        Ok(self
            .entries
            .get(&(node_id.to_string(), key))
            .map(|r| r.value().clone()))
    }

    fn put_raw(&self, node_id: &str, key: TemplateKey, payload: String) -> StorageResult<()> {
        self.entries.insert((node_id.to_string(), key), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{EntityDescriptor, SemanticContract};
    use crate::engine::{EngineConfig, EngineSpec, EngineType};

    #[test]
    fn contract_round_trip() {
        let store = InMemoryStore::new();
        let contract = SemanticContract::value(EntityDescriptor::new("Email", "email"));
        assert_eq!(store.load_contract("n1").unwrap(), None);
        store.save_contract("n1", &contract).unwrap();
        assert_eq!(store.load_contract("n1").unwrap(), Some(contract));
        assert_eq!(store.load_contract("n2").unwrap(), None);
    }

    #[test]
    fn engine_configs_keyed_by_type_and_replaced_by_new_version() {
        let store = InMemoryStore::new();
        let v1 = EngineConfig::new(EngineSpec::Pattern {
            pattern: "a".into(),
        });
        let v2 = v1.revise(EngineSpec::Pattern {
            pattern: "b".into(),
        });
        store.save_engine_config("n1", &v1).unwrap();
        store.save_engine_config("n1", &v2).unwrap();

        let loaded = store.load_engine_config("n1", EngineType::Pattern).unwrap().unwrap();
        assert_eq!(loaded.version(), 2);
        assert_eq!(store.load_engine_config("n1", EngineType::Llm).unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
