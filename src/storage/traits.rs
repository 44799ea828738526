//! Storage trait definitions

use crate::contract::SemanticContract;
use crate::engine::{EngineConfig, EngineType};
use crate::escalation::EscalationPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Which template a stored payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Contract,
    EscalationPolicy,
    Engine(EngineType),
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKey::Contract => f.write_str("contract"),
            TemplateKey::EscalationPolicy => f.write_str("escalation_policy"),
            TemplateKey::Engine(t) => write!(f, "engine:{}", t),
        }
    }
}

/// Key-value template store keyed by node identifier.
///
/// Backends implement the raw get/put; typed accessors are provided.
/// Implementations must be thread-safe (Send + Sync).
pub trait TemplateStore: Send + Sync {
    /// Load the raw JSON payload stored under (node, key).
    fn get_raw(&self, node_id: &str, key: TemplateKey) -> StorageResult<Option<String>>;

    /// Store a raw JSON payload under (node, key), replacing any previous one.
    fn put_raw(&self, node_id: &str, key: TemplateKey, payload: String) -> StorageResult<()>;

    fn load_contract(&self, node_id: &str) -> StorageResult<Option<SemanticContract>> {
        load_json(self, node_id, TemplateKey::Contract)
    }

    fn save_contract(&self, node_id: &str, contract: &SemanticContract) -> StorageResult<()> {
        save_json(self, node_id, TemplateKey::Contract, contract)
    }

    fn load_escalation_policy(&self, node_id: &str) -> StorageResult<Option<EscalationPolicy>> {
        load_json(self, node_id, TemplateKey::EscalationPolicy)
    }

    fn save_escalation_policy(&self, node_id: &str, policy: &EscalationPolicy) -> StorageResult<()> {
        save_json(self, node_id, TemplateKey::EscalationPolicy, policy)
    }

    fn load_engine_config(
        &self,
        node_id: &str,
        engine_type: EngineType,
    ) -> StorageResult<Option<EngineConfig>> {
        load_json(self, node_id, TemplateKey::Engine(engine_type))
    }

    /// Store an engine config under its own engine type. A newer version
    /// replaces the stored one.
    fn save_engine_config(&self, node_id: &str, config: &EngineConfig) -> StorageResult<()> {
        save_json(self, node_id, TemplateKey::Engine(config.engine_type()), config)
    }
}

fn load_json<S, T>(store: &S, node_id: &str, key: TemplateKey) -> StorageResult<Option<T>>
where
    S: TemplateStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get_raw(node_id, key)? {
        Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        None => Ok(None),
    }
}

fn save_json<S, T>(store: &S, node_id: &str, key: TemplateKey, value: &T) -> StorageResult<()>
where
    S: TemplateStore + ?Sized,
    T: Serialize,
{
    let payload = serde_json::to_string(value)?;
    store.put_raw(node_id, key, payload)?;
    tracing::debug!(node_id, %key, "template saved");
    Ok(())
}

/// Extension trait for opening stores from paths
pub trait OpenStore: TemplateStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
