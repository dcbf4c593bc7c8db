// Dishbook services
// Resolution, remote fetching, enrichment and the pipeline that ties them together.

pub mod dish_pipeline;
pub mod identity_resolver;
pub mod ingredient_enricher;
pub mod local_catalog;
pub mod remote_fetcher;
pub mod settings_engine;
pub mod view_tracker;
