//! HTTP API surface.

mod health;
mod marketplaces;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::events::sse_stream;
use crate::main_lib::AppState;

async fn events_handler(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl axum::response::IntoResponse {
    sse_stream(&state.event_bus)
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/marketplaces", marketplaces::router())
        .nest("/api/health", health::router())
        .route("/api/events", get(events_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
