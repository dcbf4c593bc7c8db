//! Bundled local dish dataset.
//!
//! The dataset is compiled into the binary and is static for the process
//! lifetime; lookups are synchronous and read-only.

use std::collections::HashMap;

use crate::types::dish::LocalDish;
use crate::types::errors::CatalogError;

const BUNDLED_DATASET: &str = include_str!("../../data/local_dishes.json");

/// In-memory table of local dishes keyed by identifier.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    dishes: HashMap<String, LocalDish>,
    order: Vec<String>,
}

impl LocalCatalog {
    /// Loads the dataset shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Parses a JSON array of local dishes. Duplicate identifiers are rejected.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let list: Vec<LocalDish> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_dishes(list)
    }

    pub fn from_dishes(list: Vec<LocalDish>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for dish in list {
            if catalog.dishes.contains_key(&dish.id) {
                return Err(CatalogError::DuplicateId(dish.id));
            }
            catalog.order.push(dish.id.clone());
            catalog.dishes.insert(dish.id.clone(), dish);
        }
        Ok(catalog)
    }

    pub fn get_dish_by_id(&self, id: &str) -> Option<&LocalDish> {
        self.dishes.get(id)
    }

    /// Identifiers in dataset order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}
