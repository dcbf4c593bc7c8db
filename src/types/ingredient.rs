use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-ingredient nutrition facts as reported by the nutrition source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugars: f64,
    pub sodium: f64,
}

/// An ingredient of a remote dish with its attached nutrition and allergens.
///
/// Rebuilt on every view; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInfo {
    pub name: String,
    pub measure: String,
    pub nutrition: NutritionFacts,
    pub allergens: BTreeSet<String>,
}

impl IngredientInfo {
    /// Entry used when either enrichment call failed.
    pub fn degraded(name: &str, measure: &str) -> Self {
        Self {
            name: name.to_string(),
            measure: measure.to_string(),
            nutrition: NutritionFacts::default(),
            allergens: BTreeSet::new(),
        }
    }
}
