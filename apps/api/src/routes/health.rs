use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Liveness probe reporting the configured model names.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "mistral_model": state.config.mistral_model,
        "qwen_model": state.config.qwen_model
    }))
}
