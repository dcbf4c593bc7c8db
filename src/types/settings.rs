use serde::{Deserialize, Serialize};

use super::history::MAX_HISTORY;

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Remote catalog and nutrition source settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteSettings {
    pub meal_api_base: String,
    pub nutrition_api_base: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            meal_api_base: "https://www.themealdb.com/api/json/v1/1".to_string(),
            nutrition_api_base: "https://world.openfoodfacts.org".to_string(),
            request_timeout_secs: 15,
            user_agent: format!("dishbook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Overrides the default database location under the data directory.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    MAX_HISTORY
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            max_history: MAX_HISTORY,
        }
    }
}
