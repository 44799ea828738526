//! SQLite template store

use super::traits::{OpenStore, StorageError, StorageResult, TemplateKey, TemplateStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed template store
///
/// One table of JSON payloads keyed by (node_id, key). Thread-safe via an
/// internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                node_id TEXT NOT NULL,
                key TEXT NOT NULL,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (node_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Node ids with at least one stored template, sorted.
    pub fn list_nodes(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT DISTINCT node_id FROM templates ORDER BY node_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl TemplateStore for SqliteStore {
    fn get_raw(&self, node_id: &str, key: TemplateKey) -> StorageResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let payload = conn
            .query_row(
                "SELECT payload FROM templates WHERE node_id = ?1 AND key = ?2",
                params![node_id, key.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn put_raw(&self, node_id: &str, key: TemplateKey, payload: String) -> StorageResult<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        conn.execute(
            r#"
            INSERT INTO templates (node_id, key, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(node_id, key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![node_id, key.to_string(), payload, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
