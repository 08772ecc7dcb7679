//! Liveness endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::main_lib::AppState;

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "marketplaces": state.registry.supported(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health))
}
