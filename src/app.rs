//! App Core for Dishbook.
//!
//! Central struct wiring the database, stores, remote fetcher and pipeline
//! from the loaded settings.

use std::path::PathBuf;
use std::sync::Arc;

use crate::database::connection::Database;
use crate::platform;
use crate::services::dish_pipeline::DishPipeline;
use crate::services::local_catalog::LocalCatalog;
use crate::services::remote_fetcher::{HttpRemoteFetcher, RemoteFetcher};
use crate::stores::{FavoritesStore, HistoryStore, KeyValueBackend, SqliteBackend};
use crate::types::settings::Settings;

/// Central application struct.
pub struct App {
    pub settings: Settings,
    pub catalog: Arc<LocalCatalog>,
    pub pipeline: DishPipeline,
}

impl App {
    /// Opens the configured database and builds the HTTP-backed pipeline.
    pub fn new(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let db_path = settings
            .storage
            .database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| platform::get_data_dir().join("dishbook.db"));
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Arc::new(Database::open(&db_path)?);
        let fetcher = HttpRemoteFetcher::new(&settings.remote)
            .map_err(|e| format!("Remote fetcher init failed: {}", e))?;
        tracing::info!(db = %db_path.display(), "Database opened");

        Self::with_parts(settings, Arc::new(SqliteBackend::new(db)), Arc::new(fetcher))
    }

    /// Builds an app from explicit collaborators.
    pub fn with_parts(
        settings: Settings,
        backend: Arc<dyn KeyValueBackend>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let catalog = Arc::new(LocalCatalog::bundled()?);
        let favorites = Arc::new(FavoritesStore::new(backend.clone()));
        let history = Arc::new(HistoryStore::with_capacity(
            backend,
            settings.storage.max_history,
        ));
        let pipeline = DishPipeline::new(catalog.clone(), fetcher, favorites, history);

        Ok(Self {
            settings,
            catalog,
            pipeline,
        })
    }
}
