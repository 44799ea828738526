//! Template storage
//!
//! Contracts, escalation policies, and engine configs are persisted as JSON
//! payloads in a key-value store keyed by node identifier. Two backends
//! implement the `TemplateStore` trait: `InMemoryStore` and `SqliteStore`.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{OpenStore, StorageError, StorageResult, TemplateKey, TemplateStore};
