//! Dish resolution-and-enrichment pipeline.
//!
//! One invocation walks the states
//! `Resolving → LocalReady` or
//! `Resolving → RemoteFetching → RemoteReady → EnrichingIngredients → RemoteComplete`,
//! ending in `RemoteFailed` when the remote dish cannot be fetched.
//! Progress is published as [`PipelineEvent`]s so a presentation layer can
//! render the dish before its ingredients are enriched.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use super::identity_resolver::{IdentityResolver, Resolution};
use super::ingredient_enricher::IngredientEnricher;
use super::local_catalog::LocalCatalog;
use super::remote_fetcher::RemoteFetcher;
use super::view_tracker::{ViewTicket, ViewTracker};
use crate::stores::{FavoritesStoreTrait, HistoryStoreTrait};
use crate::types::dish::{Dish, DishSummary};
use crate::types::errors::{PipelineError, StorageError};
use crate::types::ingredient::IngredientInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Resolving,
    LocalReady,
    RemoteFetching,
    RemoteReady,
    EnrichingIngredients,
    RemoteComplete,
    RemoteFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StateChanged(PipelineState),
    DishReady { dish: Dish, is_favorite: bool },
    IngredientsReady(Vec<IngredientInfo>),
    /// A history write failed; the dish is still displayed.
    StorageWarning(StorageError),
    Failed(PipelineError),
}

/// Everything the presentation layer needs for one dish.
#[derive(Debug, Clone, PartialEq)]
pub struct DishView {
    pub dish: Dish,
    pub is_favorite: bool,
    /// `None` for local dishes, which carry embedded nutrition instead.
    pub ingredients: Option<Vec<IngredientInfo>>,
    pub storage_warnings: Vec<StorageError>,
}

pub struct DishPipeline {
    resolver: IdentityResolver,
    fetcher: Arc<dyn RemoteFetcher>,
    enricher: IngredientEnricher,
    favorites: Arc<dyn FavoritesStoreTrait>,
    history: Arc<dyn HistoryStoreTrait>,
    tracker: ViewTracker,
}

impl DishPipeline {
    pub fn new(
        catalog: Arc<LocalCatalog>,
        fetcher: Arc<dyn RemoteFetcher>,
        favorites: Arc<dyn FavoritesStoreTrait>,
        history: Arc<dyn HistoryStoreTrait>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(catalog),
            enricher: IngredientEnricher::new(fetcher.clone()),
            fetcher,
            favorites,
            history,
            tracker: ViewTracker::new(),
        }
    }

    pub fn favorites(&self) -> &Arc<dyn FavoritesStoreTrait> {
        &self.favorites
    }

    pub fn history(&self) -> &Arc<dyn HistoryStoreTrait> {
        &self.history
    }

    /// Runs a whole invocation for `id` and returns the finished view.
    pub async fn view(&self, id: &str) -> Result<DishView, PipelineError> {
        let ticket = self.begin_view(id);
        self.execute(&ticket, None).await
    }

    /// Registers a new invocation; any earlier one becomes stale.
    pub fn begin_view(&self, id: &str) -> ViewTicket {
        self.tracker.begin(id)
    }

    /// Marks the running invocation as abandoned. Its late results are dropped.
    pub fn abandon_view(&self) {
        self.tracker.abandon();
    }

    /// Runs the invocation identified by `ticket`, publishing progress on `events`.
    pub async fn run(
        &self,
        ticket: &ViewTicket,
        events: &UnboundedSender<PipelineEvent>,
    ) -> Result<DishView, PipelineError> {
        self.execute(ticket, Some(events)).await
    }

    /// Presentation callback; returns the new favorite state.
    pub async fn toggle_favorite(&self, dish: &DishSummary) -> Result<bool, StorageError> {
        self.favorites.toggle_favorite(dish).await
    }

    async fn execute(
        &self,
        ticket: &ViewTicket,
        events: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<DishView, PipelineError> {
        let id = ticket.dish_id.as_str();
        self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::Resolving));

        let request = match self.resolver.resolve(id) {
            Resolution::Local(local) => {
                tracing::debug!(dish_id = %id, "Resolved from local dataset");
                let view = self.present(ticket, events, Dish::Local(local)).await;
                self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::LocalReady));
                return Ok(view);
            }
            Resolution::Remote(request) => request,
        };

        self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::RemoteFetching));
        let remote = match self.fetcher.fetch_dish_details(&request.id).await {
            Ok(remote) => remote,
            Err(e) => {
                self.ensure_current(ticket)?;
                tracing::warn!(dish_id = %id, error = %e, "Remote dish fetch failed");
                let error = PipelineError::from(e);
                self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::RemoteFailed));
                self.emit(ticket, events, PipelineEvent::Failed(error.clone()));
                return Err(error);
            }
        };
        self.ensure_current(ticket)?;

        let mut view = self.present(ticket, events, Dish::Remote(remote.clone())).await;
        self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::RemoteReady));

        self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::EnrichingIngredients));
        let ingredients = self.enricher.enrich(&remote).await;
        self.ensure_current(ticket)?;

        self.emit(ticket, events, PipelineEvent::IngredientsReady(ingredients.clone()));
        self.emit(ticket, events, PipelineEvent::StateChanged(PipelineState::RemoteComplete));
        view.ingredients = Some(ingredients);

        tracing::info!(dish_id = %id, "Remote dish view complete");
        Ok(view)
    }

    /// Records the view in history, reads favorite state and publishes the dish.
    async fn present(
        &self,
        ticket: &ViewTicket,
        events: Option<&UnboundedSender<PipelineEvent>>,
        dish: Dish,
    ) -> DishView {
        let summary = dish.summary();
        let mut storage_warnings = Vec::new();

        if let Err(e) = self.history.record_view(&summary).await {
            tracing::warn!(dish_id = %summary.id, error = %e, "History write failed");
            self.emit(ticket, events, PipelineEvent::StorageWarning(e.clone()));
            storage_warnings.push(e);
        }
        let is_favorite = self.favorites.is_favorite(&summary.id).await;

        self.emit(
            ticket,
            events,
            PipelineEvent::DishReady {
                dish: dish.clone(),
                is_favorite,
            },
        );

        DishView {
            dish,
            is_favorite,
            ingredients: None,
            storage_warnings,
        }
    }

    fn ensure_current(&self, ticket: &ViewTicket) -> Result<(), PipelineError> {
        if self.tracker.is_current(ticket) {
            return Ok(());
        }
        tracing::debug!(dish_id = %ticket.dish_id, "Discarding result of superseded view");
        Err(PipelineError::Superseded(ticket.dish_id.clone()))
    }

    fn emit(
        &self,
        ticket: &ViewTicket,
        events: Option<&UnboundedSender<PipelineEvent>>,
        event: PipelineEvent,
    ) {
        let Some(tx) = events else { return };
        if self.tracker.is_current(ticket) {
            // A dropped receiver only means nobody is rendering anymore.
            let _ = tx.send(event);
        }
    }
}
