//! History Store for Dishbook.
//!
//! Implements `HistoryStoreTrait`: a bounded, most-recent-first log of viewed
//! dishes with dedup-and-promote semantics.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{read_list, read_list_for_update, write_list, KeyValueBackend, HISTORY_KEY};
use crate::types::dish::DishSummary;
use crate::types::errors::StorageError;
use crate::types::history::{HistoryEntry, MAX_HISTORY};

/// Trait defining history operations.
#[async_trait]
pub trait HistoryStoreTrait: Send + Sync {
    /// Moves `dish` to the front of the history with a fresh timestamp.
    async fn record_view(&self, dish: &DishSummary) -> Result<(), StorageError>;
    async fn list_history(&self) -> Vec<HistoryEntry>;
    async fn remove_entry(&self, id: &str) -> Result<bool, StorageError>;
    async fn clear_history(&self) -> Result<(), StorageError>;
}

/// History store owning the `history` slot of a backend.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueBackend>,
    max_entries: usize,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Creates a store retaining at most [`MAX_HISTORY`] entries.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self::with_capacity(backend, MAX_HISTORY)
    }

    /// Creates a store retaining at most `max_entries` entries (minimum 1).
    pub fn with_capacity(backend: Arc<dyn KeyValueBackend>, max_entries: usize) -> Self {
        Self {
            backend,
            max_entries: max_entries.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn load(&self) -> Vec<HistoryEntry> {
        read_list(self.backend.as_ref(), HISTORY_KEY)
    }

    fn load_for_update(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        read_list_for_update(self.backend.as_ref(), HISTORY_KEY)
    }
}

#[async_trait]
impl HistoryStoreTrait for HistoryStore {
    async fn record_view(&self, dish: &DishSummary) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load_for_update()?;

        history.retain(|e| e.id != dish.id);
        history.insert(0, HistoryEntry::new(dish, Self::now()));
        history.truncate(self.max_entries);

        write_list(self.backend.as_ref(), HISTORY_KEY, &history)?;
        tracing::debug!(dish_id = %dish.id, len = history.len(), "History view recorded");
        Ok(())
    }

    async fn list_history(&self) -> Vec<HistoryEntry> {
        self.load()
    }

    async fn remove_entry(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load_for_update()?;
        let before = history.len();
        history.retain(|e| e.id != id);
        if history.len() == before {
            return Ok(false);
        }
        write_list(self.backend.as_ref(), HISTORY_KEY, &history)?;
        Ok(true)
    }

    async fn clear_history(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        write_list::<HistoryEntry>(self.backend.as_ref(), HISTORY_KEY, &[])
    }
}
