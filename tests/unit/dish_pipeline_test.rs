//! Integration tests for the dish pipeline.
//!
//! Exercises local precedence, the remote path with enrichment, failure
//! surfacing, side effects on favorites/history, progress events and
//! discarding of superseded results. Remote calls go to an in-test stub.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{mpsc, Notify};

use dishbook::services::dish_pipeline::{DishPipeline, PipelineEvent, PipelineState};
use dishbook::services::local_catalog::LocalCatalog;
use dishbook::services::remote_fetcher::RemoteFetcher;
use dishbook::stores::{
    FavoritesStore, FavoritesStoreTrait, HistoryStore, HistoryStoreTrait, KeyValueBackend,
    MemoryBackend,
};
use dishbook::types::dish::{Dish, RemoteDish};
use dishbook::types::errors::{FetchError, PipelineError, StorageError};
use dishbook::types::ingredient::NutritionFacts;

#[derive(Default)]
struct StubFetcher {
    dishes: HashMap<String, RemoteDish>,
    nutrition: HashMap<String, NutritionFacts>,
    network_down: bool,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    dish_calls: AtomicUsize,
    ingredient_calls: AtomicUsize,
}

#[async_trait]
impl RemoteFetcher for StubFetcher {
    async fn fetch_dish_details(&self, id: &str) -> Result<RemoteDish, FetchError> {
        self.dish_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        if self.network_down {
            return Err(FetchError::Network("connection reset".into()));
        }
        self.dishes
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }

    async fn fetch_nutrition(&self, ingredient: &str) -> Result<NutritionFacts, FetchError> {
        self.ingredient_calls.fetch_add(1, Ordering::SeqCst);
        self.nutrition
            .get(ingredient)
            .copied()
            .ok_or_else(|| FetchError::UnknownIngredient(ingredient.to_string()))
    }

    async fn fetch_allergens(&self, ingredient: &str) -> Result<BTreeSet<String>, FetchError> {
        self.ingredient_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BTreeSet::from([format!("{}-allergen", ingredient)]))
    }
}

fn remote_dish(id: &str, ingredients: &[&str]) -> RemoteDish {
    let mut record = json!({
        "idMeal": id,
        "strMeal": format!("Remote {}", id),
        "strMealThumb": format!("https://img.example/{}.jpg", id),
        "strInstructions": "Cook it.",
    });
    for (i, name) in ingredients.iter().enumerate() {
        record[format!("strIngredient{}", i + 1)] = json!(name);
        record[format!("strMeasure{}", i + 1)] = json!("1 cup");
    }
    RemoteDish::from_payload(record.as_object().unwrap()).unwrap()
}

fn facts(calories: f64) -> NutritionFacts {
    NutritionFacts {
        calories,
        protein: 1.0,
        fat: 2.0,
        sugars: 3.0,
        sodium: 4.0,
    }
}

struct Harness {
    pipeline: DishPipeline,
    fetcher: Arc<StubFetcher>,
    favorites: Arc<FavoritesStore>,
    history: Arc<HistoryStore>,
}

fn setup_with_backend(fetcher: StubFetcher, backend: Arc<dyn KeyValueBackend>) -> Harness {
    let catalog = Arc::new(LocalCatalog::bundled().unwrap());
    let fetcher = Arc::new(fetcher);
    let favorites = Arc::new(FavoritesStore::new(backend.clone()));
    let history = Arc::new(HistoryStore::new(backend));
    let pipeline = DishPipeline::new(catalog, fetcher.clone(), favorites.clone(), history.clone());
    Harness {
        pipeline,
        fetcher,
        favorites,
        history,
    }
}

fn setup(fetcher: StubFetcher) -> Harness {
    setup_with_backend(fetcher, Arc::new(MemoryBackend::new()))
}

fn first_local_id() -> String {
    LocalCatalog::bundled().unwrap().ids()[0].clone()
}

#[tokio::test]
async fn test_local_id_never_consults_remote() {
    let local_id = first_local_id();
    let mut fetcher = StubFetcher::default();
    // The remote source also knows this identifier; local must still win.
    fetcher
        .dishes
        .insert(local_id.clone(), remote_dish(&local_id, &["flour"]));
    let h = setup(fetcher);

    let view = h.pipeline.view(&local_id).await.unwrap();

    assert!(view.dish.is_local());
    assert_eq!(view.ingredients, None);
    assert_eq!(h.fetcher.dish_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.fetcher.ingredient_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_local_view_records_history_and_reads_favorite() {
    let local_id = first_local_id();
    let h = setup(StubFetcher::default());

    let view = h.pipeline.view(&local_id).await.unwrap();
    assert!(!view.is_favorite);
    assert!(view.storage_warnings.is_empty());

    h.pipeline.toggle_favorite(&view.dish.summary()).await.unwrap();
    let view = h.pipeline.view(&local_id).await.unwrap();
    assert!(view.is_favorite);

    let history = h.history.list_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, local_id);
}

#[tokio::test]
async fn test_remote_view_enriches_in_slot_order() {
    let mut fetcher = StubFetcher::default();
    fetcher
        .dishes
        .insert("52772".into(), remote_dish("52772", &["soy sauce", "water", "garlic"]));
    fetcher.nutrition.insert("soy sauce".into(), facts(53.0));
    fetcher.nutrition.insert("garlic".into(), facts(149.0));
    let h = setup(fetcher);

    let view = h.pipeline.view("52772").await.unwrap();
    let ingredients = view.ingredients.expect("remote dish carries ingredients");

    let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["soy sauce", "water", "garlic"]);
    assert_eq!(ingredients[0].nutrition, facts(53.0));
    assert!(ingredients[0].allergens.contains("soy sauce-allergen"));
    // "water" has no nutrition record: degraded entry.
    assert_eq!(ingredients[1].nutrition, NutritionFacts::default());
    assert!(ingredients[1].allergens.is_empty());
    assert_eq!(ingredients[2].nutrition, facts(149.0));

    assert_eq!(h.history.list_history().await[0].id, "52772");
    assert_eq!(h.fetcher.ingredient_calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_remote_not_found_has_no_side_effects() {
    let h = setup(StubFetcher::default());

    let err = h.pipeline.view("does-not-exist").await.unwrap_err();

    assert_eq!(err, PipelineError::NotFound("does-not-exist".into()));
    assert!(h.history.list_history().await.is_empty());
    assert_eq!(h.fetcher.ingredient_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_remote_network_error_is_surfaced() {
    let h = setup(StubFetcher {
        network_down: true,
        ..Default::default()
    });

    let err = h.pipeline.view("52772").await.unwrap_err();
    assert!(matches!(err, PipelineError::Network(_)));
    assert!(h.history.list_history().await.is_empty());
}

#[tokio::test]
async fn test_events_follow_remote_state_machine() {
    let mut fetcher = StubFetcher::default();
    fetcher.dishes.insert("1".into(), remote_dish("1", &["egg"]));
    let h = setup(fetcher);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticket = h.pipeline.begin_view("1");
    h.pipeline.run(&ticket, &tx).await.unwrap();
    drop(tx);

    let mut states = Vec::new();
    let mut saw_dish = false;
    let mut saw_ingredients = false;
    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::StateChanged(state) => states.push(state),
            PipelineEvent::DishReady { dish, is_favorite } => {
                assert!(matches!(dish, Dish::Remote(_)));
                assert!(!is_favorite);
                assert!(!saw_ingredients, "dish must be published before ingredients");
                saw_dish = true;
            }
            PipelineEvent::IngredientsReady(list) => {
                assert_eq!(list.len(), 1);
                saw_ingredients = true;
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    assert!(saw_dish && saw_ingredients);
    assert_eq!(
        states,
        vec![
            PipelineState::Resolving,
            PipelineState::RemoteFetching,
            PipelineState::RemoteReady,
            PipelineState::EnrichingIngredients,
            PipelineState::RemoteComplete,
        ]
    );
}

#[tokio::test]
async fn test_failed_fetch_emits_terminal_state() {
    let h = setup(StubFetcher::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticket = h.pipeline.begin_view("missing");
    assert!(h.pipeline.run(&ticket, &tx).await.is_err());
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events.last(),
        Some(&PipelineEvent::Failed(PipelineError::NotFound("missing".into())))
    );
    assert!(events.contains(&PipelineEvent::StateChanged(PipelineState::RemoteFailed)));
}

#[tokio::test]
async fn test_abandoned_view_discards_late_result() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut fetcher = StubFetcher {
        gate: Some((started.clone(), release.clone())),
        ..Default::default()
    };
    fetcher.dishes.insert("7".into(), remote_dish("7", &["rice"]));
    let h = setup(fetcher);

    let (result, _) = tokio::join!(h.pipeline.view("7"), async {
        started.notified().await;
        h.pipeline.abandon_view();
        release.notify_one();
    });

    assert_eq!(result.unwrap_err(), PipelineError::Superseded("7".into()));
    assert!(h.history.list_history().await.is_empty());
    assert_eq!(h.fetcher.ingredient_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_fetch_after_abandon_reports_superseded() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let fetcher = StubFetcher {
        gate: Some((started.clone(), release.clone())),
        network_down: true,
        ..Default::default()
    };
    let h = setup(fetcher);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticket = h.pipeline.begin_view("8");
    let (result, _) = tokio::join!(h.pipeline.run(&ticket, &tx), async {
        started.notified().await;
        h.pipeline.abandon_view();
        release.notify_one();
    });
    drop(tx);

    assert_eq!(result.unwrap_err(), PipelineError::Superseded("8".into()));
    while let Some(event) = rx.recv().await {
        assert!(!matches!(event, PipelineEvent::Failed(_)));
    }
}

struct ReadOnlyBackend;

impl KeyValueBackend for ReadOnlyBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Database("attempt to write a readonly database".into()))
    }
}

#[tokio::test]
async fn test_history_write_failure_does_not_abort_view() {
    let h = setup_with_backend(StubFetcher::default(), Arc::new(ReadOnlyBackend));

    let view = h.pipeline.view(&first_local_id()).await.unwrap();

    assert_eq!(view.storage_warnings.len(), 1);
    assert!(matches!(view.storage_warnings[0], StorageError::Database(_)));
    assert!(!h.favorites.is_favorite(view.dish.id()).await);
}

#[tokio::test]
async fn test_repeated_ingredient_names_are_kept() {
    let mut fetcher = StubFetcher::default();
    fetcher
        .dishes
        .insert("9".into(), remote_dish("9", &["salt", "salt", "pepper"]));
    let h = setup(fetcher);

    let view = h.pipeline.view("9").await.unwrap();
    let names: Vec<String> = view
        .ingredients
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["salt", "salt", "pepper"]);
}
