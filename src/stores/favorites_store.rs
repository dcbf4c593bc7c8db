//! Favorites Store for Dishbook.
//!
//! Implements `FavoritesStoreTrait`: membership checks and toggling of
//! favorited dishes, persisted as a JSON list in a single backend slot.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{read_list, read_list_for_update, write_list, KeyValueBackend, FAVORITES_KEY};
use crate::types::dish::DishSummary;
use crate::types::errors::StorageError;
use crate::types::favorite::FavoriteEntry;

/// Trait defining favorites operations.
#[async_trait]
pub trait FavoritesStoreTrait: Send + Sync {
    async fn is_favorite(&self, id: &str) -> bool;
    /// Flips membership of `dish` and returns the new state.
    async fn toggle_favorite(&self, dish: &DishSummary) -> Result<bool, StorageError>;
    async fn list_favorites(&self) -> Vec<FavoriteEntry>;
    /// Returns whether an entry was removed.
    async fn remove_favorite(&self, id: &str) -> Result<bool, StorageError>;
}

/// Favorites store owning the `favorites` slot of a backend.
pub struct FavoritesStore {
    backend: Arc<dyn KeyValueBackend>,
    // Serializes read-modify-write cycles so concurrent toggles cannot lose updates.
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<FavoriteEntry> {
        read_list(self.backend.as_ref(), FAVORITES_KEY)
    }

    fn load_for_update(&self) -> Result<Vec<FavoriteEntry>, StorageError> {
        read_list_for_update(self.backend.as_ref(), FAVORITES_KEY)
    }
}

#[async_trait]
impl FavoritesStoreTrait for FavoritesStore {
    async fn is_favorite(&self, id: &str) -> bool {
        self.load().iter().any(|f| f.id == id)
    }

    async fn toggle_favorite(&self, dish: &DishSummary) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut favorites = self.load_for_update()?;

        let now_favorite = if favorites.iter().any(|f| f.id == dish.id) {
            favorites.retain(|f| f.id != dish.id);
            false
        } else {
            favorites.push(FavoriteEntry::from(dish));
            true
        };

        write_list(self.backend.as_ref(), FAVORITES_KEY, &favorites)?;
        tracing::debug!(dish_id = %dish.id, favorite = now_favorite, "Favorite toggled");
        Ok(now_favorite)
    }

    async fn list_favorites(&self) -> Vec<FavoriteEntry> {
        self.load()
    }

    async fn remove_favorite(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut favorites = self.load_for_update()?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            return Ok(false);
        }
        write_list(self.backend.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(true)
    }
}
