// Dishbook persisted stores
// Favorites and history each own one slot of a key/value backend.

pub mod backend;
pub mod favorites_store;
pub mod history_store;

pub use backend::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use favorites_store::{FavoritesStore, FavoritesStoreTrait};
pub use history_store::{HistoryStore, HistoryStoreTrait};
