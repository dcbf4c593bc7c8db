//! Ingredient Enricher for Dishbook.
//!
//! Attaches nutrition and allergen facts to every ingredient of a remote dish.
//! All lookups run concurrently and the whole operation completes only once
//! every ingredient has resolved, degraded or not.

use std::sync::Arc;

use futures::future::join_all;

use super::remote_fetcher::RemoteFetcher;
use crate::types::dish::{IngredientSlot, RemoteDish};
use crate::types::ingredient::IngredientInfo;

pub struct IngredientEnricher {
    fetcher: Arc<dyn RemoteFetcher>,
}

impl IngredientEnricher {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self { fetcher }
    }

    /// Returns one entry per populated slot, in slot order.
    ///
    /// Never fails: an ingredient whose nutrition or allergen lookup fails is
    /// returned with zeroed nutrition and no allergens.
    pub async fn enrich(&self, dish: &RemoteDish) -> Vec<IngredientInfo> {
        let lookups = dish.ingredient_slots().map(|slot| self.enrich_one(slot));
        let results = join_all(lookups).await;

        let degraded = results.iter().filter(|(_, ok)| !ok).count();
        let ingredients: Vec<IngredientInfo> = results.into_iter().map(|(info, _)| info).collect();
        tracing::info!(
            dish_id = %dish.id,
            ingredients = ingredients.len(),
            degraded,
            "Ingredient enrichment complete"
        );
        ingredients
    }

    /// Second element is `false` when the entry was degraded.
    async fn enrich_one(&self, slot: &IngredientSlot) -> (IngredientInfo, bool) {
        let (nutrition, allergens) = futures::join!(
            self.fetcher.fetch_nutrition(&slot.name),
            self.fetcher.fetch_allergens(&slot.name)
        );

        match (nutrition, allergens) {
            (Ok(nutrition), Ok(allergens)) => (
                IngredientInfo {
                    name: slot.name.clone(),
                    measure: slot.measure.clone(),
                    nutrition,
                    allergens,
                },
                true,
            ),
            (nutrition, allergens) => {
                let error = nutrition.err().or(allergens.err());
                tracing::warn!(
                    ingredient = %slot.name,
                    error = ?error,
                    "Enrichment failed, using degraded entry"
                );
                (IngredientInfo::degraded(&slot.name, &slot.measure), false)
            }
        }
    }
}
