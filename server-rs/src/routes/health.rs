use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let backend_ok = state.store.health_check().await;

    let status = if backend_ok { "healthy" } else { "degraded" };
    Json(json!({
        "status": status,
        "backend": backend_ok,
        "timestamp": chrono::Utc::now(),
    }))
}
