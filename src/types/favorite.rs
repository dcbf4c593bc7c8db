use serde::{Deserialize, Serialize};

use super::dish::DishSummary;

/// A favorited dish, persisted in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
}

impl From<&DishSummary> for FavoriteEntry {
    fn from(dish: &DishSummary) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            thumbnail: dish.thumbnail.clone(),
        }
    }
}
