//! Durable key/value slots backing the favorites and history stores.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::types::errors::StorageError;

/// Slot holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "favorites";
/// Slot holding the serialized history list.
pub const HISTORY_KEY: &str = "history";

/// String-keyed storage surviving process restarts.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Backend storing slots in the `kv_store` SQLite table.
pub struct SqliteBackend {
    db: Arc<Database>,
}

impl SqliteBackend {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.db.connection()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

/// Process-local backend. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads a JSON list from `key` for display. Missing, unreadable or corrupt
/// slots yield an empty list.
pub(crate) fn read_list<T: serde::de::DeserializeOwned>(
    backend: &dyn KeyValueBackend,
    key: &str,
) -> Vec<T> {
    match backend.get(key) {
        Ok(raw) => decode_list(key, raw),
        Err(e) => {
            tracing::warn!(key, error = %e, "Store read failed, treating as empty");
            Vec::new()
        }
    }
}

/// Reads a JSON list from `key` ahead of a rewrite. Backend failures are
/// returned so the caller never overwrites a slot it could not read; a corrupt
/// payload still resets to empty.
pub(crate) fn read_list_for_update<T: serde::de::DeserializeOwned>(
    backend: &dyn KeyValueBackend,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    let raw = backend.get(key)?;
    Ok(decode_list(key, raw))
}

fn decode_list<T: serde::de::DeserializeOwned>(key: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(key, error = %e, "Store payload corrupt, treating as empty");
            Vec::new()
        }
    }
}

pub(crate) fn write_list<T: serde::Serialize>(
    backend: &dyn KeyValueBackend,
    key: &str,
    list: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(list).map_err(|e| StorageError::Serialization(e.to_string()))?;
    backend.set(key, &raw)
}
