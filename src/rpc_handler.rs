//! RPC method handler for the Dishbook JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the pipeline and stores.

use serde_json::{json, Value};

use crate::app::App;
use crate::services::dish_pipeline::DishView;
use crate::stores::{FavoritesStoreTrait, HistoryStoreTrait};
use crate::types::dish::DishSummary;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn view_to_json(view: &DishView) -> Result<Value, String> {
    let dish = serde_json::to_value(&view.dish).map_err(|e| e.to_string())?;
    let ingredients = match &view.ingredients {
        Some(list) => serde_json::to_value(list).map_err(|e| e.to_string())?,
        None => Value::Null,
    };
    let warnings: Vec<String> = view.storage_warnings.iter().map(|w| w.to_string()).collect();
    Ok(json!({
        "dish": dish,
        "summary": view.dish.summary(),
        "is_favorite": view.is_favorite,
        "ingredients": ingredients,
        "warnings": warnings,
    }))
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let pipeline = &app.pipeline;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Dishes ───
        "dish.view" => {
            let id = str_param(params, "id")?;
            let view = pipeline.view(id).await.map_err(|e| e.to_string())?;
            view_to_json(&view)
        }
        "dish.local_ids" => Ok(json!(app.catalog.ids())),

        // ─── Favorites ───
        "favorite.toggle" => {
            let summary = DishSummary {
                id: str_param(params, "id")?.to_string(),
                name: str_param(params, "name")?.to_string(),
                thumbnail: params
                    .get("thumbnail")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            };
            let favorite = pipeline.toggle_favorite(&summary).await.map_err(|e| e.to_string())?;
            Ok(json!({"id": summary.id, "is_favorite": favorite}))
        }
        "favorite.check" => {
            let id = str_param(params, "id")?;
            let favorite = pipeline.favorites().is_favorite(id).await;
            Ok(json!({"id": id, "is_favorite": favorite}))
        }
        "favorite.list" => {
            let items = pipeline.favorites().list_favorites().await;
            Ok(json!({"items": items}))
        }
        "favorite.remove" => {
            let id = str_param(params, "id")?;
            let removed = pipeline.favorites().remove_favorite(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": removed}))
        }

        // ─── History ───
        "history.list" => {
            let items = pipeline.history().list_history().await;
            Ok(json!({"items": items}))
        }
        "history.remove" => {
            let id = str_param(params, "id")?;
            let removed = pipeline.history().remove_entry(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": removed}))
        }
        "history.clear" => {
            pipeline.history().clear_history().await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => serde_json::to_value(&app.settings).map_err(|e| e.to_string()),

        _ => Err(format!("unknown method: {}", method)),
    }
}
