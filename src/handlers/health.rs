use axum::response::Json;
use serde_json::{json, Value};
use tracing::instrument;

/// Health check endpoint handler
#[instrument(name = "health_check")]
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
