//! Remote Fetcher boundary and its HTTP implementation.
//!
//! The pipeline only depends on [`RemoteFetcher`]; each call is a single
//! attempt and timeout policy lives in the HTTP client.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::types::dish::RemoteDish;
use crate::types::errors::FetchError;
use crate::types::ingredient::NutritionFacts;
use crate::types::settings::RemoteSettings;

/// Source of remote dish details and per-ingredient facts.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch_dish_details(&self, id: &str) -> Result<RemoteDish, FetchError>;
    async fn fetch_nutrition(&self, ingredient: &str) -> Result<NutritionFacts, FetchError>;
    async fn fetch_allergens(&self, ingredient: &str) -> Result<BTreeSet<String>, FetchError>;
}

type ProductSlot = OnceCell<Result<Value, FetchError>>;

/// Fetcher talking to a MealDB-style catalog and an Open Food Facts-style
/// product search.
///
/// Nutrition and allergens both come from the same product search. Calls for
/// one ingredient that overlap in time share a single request; a call made
/// after the others finished searches again.
pub struct HttpRemoteFetcher {
    http_client: reqwest::Client,
    meal_api_base: String,
    nutrition_api_base: String,
    in_flight: Mutex<HashMap<String, Weak<ProductSlot>>>,
}

impl HttpRemoteFetcher {
    pub fn new(settings: &RemoteSettings) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            meal_api_base: settings.meal_api_base.trim_end_matches('/').to_string(),
            nutrition_api_base: settings.nutrition_api_base.trim_end_matches('/').to_string(),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Issues a GET and decodes the JSON body. 404 maps to `None`.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Option<Value>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {} from {}", status.as_u16(), url)));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        Ok(Some(body))
    }

    async fn search_product(&self, ingredient: &str) -> Result<Value, FetchError> {
        let url = format!("{}/cgi/search.pl", self.nutrition_api_base);
        tracing::debug!(ingredient, "Querying nutrition source");
        let body = self
            .get_json(
                &url,
                &[
                    ("search_terms", ingredient),
                    ("search_simple", "1"),
                    ("json", "1"),
                    ("page_size", "1"),
                ],
            )
            .await?
            .ok_or_else(|| FetchError::UnknownIngredient(ingredient.to_string()))?;
        first_product(&body, ingredient)
    }

    /// Product search for `ingredient`, shared with any overlapping caller.
    async fn product_for(&self, ingredient: &str) -> Result<Value, FetchError> {
        let slot = self.shared_slot(ingredient);
        slot.get_or_init(|| self.search_product(ingredient))
            .await
            .clone()
    }

    fn shared_slot(&self, ingredient: &str) -> Arc<ProductSlot> {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(slot) = in_flight.get(ingredient).and_then(Weak::upgrade) {
            return slot;
        }
        in_flight.retain(|_, slot| slot.strong_count() > 0);
        let slot = Arc::new(ProductSlot::new());
        in_flight.insert(ingredient.to_string(), Arc::downgrade(&slot));
        slot
    }
}

#[async_trait]
impl RemoteFetcher for HttpRemoteFetcher {
    async fn fetch_dish_details(&self, id: &str) -> Result<RemoteDish, FetchError> {
        let url = format!("{}/lookup.php", self.meal_api_base);
        tracing::debug!(dish_id = %id, url = %url, "Fetching remote dish");
        match self.get_json(&url, &[("i", id)]).await? {
            Some(body) => parse_meal_lookup(&body, id),
            None => Err(FetchError::NotFound(id.to_string())),
        }
    }

    async fn fetch_nutrition(&self, ingredient: &str) -> Result<NutritionFacts, FetchError> {
        let product = self.product_for(ingredient).await?;
        Ok(parse_nutrition(&product))
    }

    async fn fetch_allergens(&self, ingredient: &str) -> Result<BTreeSet<String>, FetchError> {
        let product = self.product_for(ingredient).await?;
        Ok(parse_allergens(&product))
    }
}

/// Extracts the single dish from a `lookup.php` response.
pub fn parse_meal_lookup(body: &Value, id: &str) -> Result<RemoteDish, FetchError> {
    let meals = match body.get("meals") {
        Some(Value::Array(meals)) => meals,
        Some(Value::Null) | None => return Err(FetchError::NotFound(id.to_string())),
        Some(other) => {
            return Err(FetchError::Parse(format!("unexpected `meals` value: {}", other)))
        }
    };

    let record = match meals.first() {
        Some(Value::Object(record)) => record,
        Some(_) => return Err(FetchError::Parse("meal record is not an object".to_string())),
        None => return Err(FetchError::NotFound(id.to_string())),
    };

    RemoteDish::from_payload(record)
        .ok_or_else(|| FetchError::Parse("meal record has no idMeal".to_string()))
}

/// Returns the first product of a search response.
pub fn first_product(body: &Value, ingredient: &str) -> Result<Value, FetchError> {
    body.get("products")
        .and_then(Value::as_array)
        .and_then(|products| products.first())
        .cloned()
        .ok_or_else(|| FetchError::UnknownIngredient(ingredient.to_string()))
}

/// Per-100g nutriments of a product; missing values read as zero.
pub fn parse_nutrition(product: &Value) -> NutritionFacts {
    let nutriments = product.get("nutriments");
    let read = |key: &str| -> f64 {
        match nutriments.and_then(|n| n.get(key)) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    };

    NutritionFacts {
        calories: read("energy-kcal_100g"),
        protein: read("proteins_100g"),
        fat: read("fat_100g"),
        sugars: read("sugars_100g"),
        sodium: read("sodium_100g"),
    }
}

/// Allergen tags of a product with the language prefix (`en:`) removed.
pub fn parse_allergens(product: &Value) -> BTreeSet<String> {
    product
        .get("allergens_tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(|tag| match tag.split_once(':') {
                    Some((_, name)) => name.to_string(),
                    None => tag.to_string(),
                })
                .filter(|tag| !tag.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
