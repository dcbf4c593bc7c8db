use thiserror::Error;

// === FetchError ===

/// Failures reported by the remote fetcher. Every call is a single attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The remote catalog has no dish with this identifier.
    #[error("Dish not found: {0}")]
    NotFound(String),
    /// Transport failure or non-success status.
    #[error("Network error: {0}")]
    Network(String),
    /// The nutrition source knows nothing about this ingredient.
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),
    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

// === StorageError ===

/// Failures of the persistence backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Storage database error: {0}")]
    Database(String),
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    /// The backend lock was poisoned by a panicking writer.
    #[error("Storage lock error: {0}")]
    Lock(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === PipelineError ===

/// Why a dish could not be displayed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Cannot display dish {0}: not found")]
    NotFound(String),
    #[error("Cannot display dish: {0}")]
    Network(String),
    /// A newer view was started, or the view was abandoned, before this one finished.
    #[error("View of dish {0} was superseded")]
    Superseded(String),
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(id) => PipelineError::NotFound(id),
            FetchError::Network(msg) | FetchError::Parse(msg) => PipelineError::Network(msg),
            FetchError::UnknownIngredient(name) => {
                PipelineError::Network(format!("unexpected ingredient error: {}", name))
            }
        }
    }
}

// === CatalogError ===

/// Errors loading the bundled local dataset.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(String),
    #[error("Duplicate dish id in catalog: {0}")]
    DuplicateId(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(String),
    #[error("Settings serialization error: {0}")]
    Serialization(String),
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
