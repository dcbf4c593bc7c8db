use serde::{Deserialize, Serialize};

use super::dish::DishSummary;

/// Default bound on the number of retained history entries.
pub const MAX_HISTORY: usize = 50;

/// A viewed dish. `viewed_at` is UNIX time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub viewed_at: i64,
}

impl HistoryEntry {
    pub fn new(dish: &DishSummary, viewed_at: i64) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            thumbnail: dish.thumbnail.clone(),
            viewed_at,
        }
    }
}
