//! Marketplace connection and cross-listing endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use sellbridge_core::crosslist::MarketplaceOutcome;
use sellbridge_core::listings::Listing;
use sellbridge_core::sync_log::SyncLogEntry;
use sellbridge_marketplace::Marketplace;

/// Caller identity comes from the gateway in front of this service.
const USER_HEADER: &str = "x-user-id";

fn require_user(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_HEADER)))
}

fn parse_marketplace(raw: &str) -> ApiResult<Marketplace> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown marketplace '{}'", raw)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceInfo {
    id: Marketplace,
    name: String,
    is_functional: bool,
}

#[derive(Debug, Deserialize)]
struct AuthUrlQuery {
    state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthUrlResponse {
    url: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResponse {
    marketplace: Marketplace,
    shop_name: Option<String>,
    connected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrossListRequest {
    product_id: String,
    marketplaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncInventoryRequest {
    product_id: String,
    quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityResponse {
    entries: Vec<SyncLogEntry>,
    total_cost_saved: Decimal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn list_marketplaces(State(state): State<Arc<AppState>>) -> Json<Vec<MarketplaceInfo>> {
    let infos = state
        .registry
        .providers()
        .map(|(marketplace, provider)| MarketplaceInfo {
            id: marketplace,
            name: provider.display_name().to_string(),
            is_functional: provider.is_functional(),
        })
        .collect();
    Json(infos)
}

async fn connected_marketplaces(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Marketplace>>> {
    let user_id = require_user(&headers)?;
    let mut connected = state.credential_service.connected_marketplaces(&user_id)?;
    connected.sort();
    Ok(Json(connected))
}

async fn auth_url(
    State(state): State<Arc<AppState>>,
    Path(marketplace): Path<String>,
    Query(query): Query<AuthUrlQuery>,
) -> ApiResult<Json<AuthUrlResponse>> {
    let marketplace = parse_marketplace(&marketplace)?;
    let provider = state.registry.get(marketplace)?;

    // The state token is opaque to the provider; callers that don't
    // supply one get a fresh random token to verify on callback.
    let state_token = query
        .state
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let url = provider.auth_url(&state_token)?;

    Ok(Json(AuthUrlResponse {
        url,
        state: state_token,
    }))
}

async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(marketplace): Path<String>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<ConnectResponse>> {
    let user_id = require_user(&headers)?;
    let marketplace = parse_marketplace(&marketplace)?;

    let stored = state
        .credential_service
        .connect(&user_id, marketplace, &query.code)
        .await?;

    Ok(Json(ConnectResponse {
        marketplace,
        shop_name: stored.shop_name,
        connected: true,
    }))
}

async fn cross_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CrossListRequest>,
) -> ApiResult<Json<HashMap<Marketplace, MarketplaceOutcome>>> {
    let user_id = require_user(&headers)?;
    if body.marketplaces.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one marketplace is required".to_string(),
        ));
    }

    let mut targets = Vec::with_capacity(body.marketplaces.len());
    for raw in &body.marketplaces {
        targets.push(parse_marketplace(raw)?);
    }

    let results = state
        .crosslist_service
        .cross_list(&body.product_id, &targets, &user_id)
        .await?;
    Ok(Json(results))
}

async fn sync_inventory(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SyncInventoryRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let user_id = require_user(&headers)?;
    if body.quantity < 0 {
        return Err(ApiError::BadRequest(
            "quantity cannot be negative".to_string(),
        ));
    }

    // Fire-and-forget: outcomes arrive per marketplace on the event
    // stream, not in this response.
    let service = state.inventory_service.clone();
    tokio::spawn(async move {
        if let Err(e) = service
            .sync_inventory(&body.product_id, body.quantity, &user_id)
            .await
        {
            tracing::error!("Inventory sync for {} failed to start: {}", body.product_id, e);
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "accepted" })),
    ))
}

async fn disconnect(
    State(state): State<Arc<AppState>>,
    Path(marketplace): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = require_user(&headers)?;
    let marketplace = parse_marketplace(&marketplace)?;

    state
        .credential_service
        .disconnect(&user_id, marketplace)
        .await?;
    Ok(Json(serde_json::json!({ "disconnected": true })))
}

async fn listings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Listing>>> {
    let user_id = require_user(&headers)?;
    let listings = state.listing_service.list_for_user(&user_id).await?;
    Ok(Json(listings))
}

async fn activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ActivityResponse>> {
    let user_id = require_user(&headers)?;
    let entries = state.sync_log.list_recent(&user_id, 50)?;
    let total_cost_saved = state.sync_log.total_cost_saved(&user_id)?;
    Ok(Json(ActivityResponse {
        entries,
        total_cost_saved,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_marketplaces))
        .route("/connected", get(connected_marketplaces))
        .route("/listings", get(listings))
        .route("/activity", get(activity))
        .route("/cross-list", post(cross_list))
        .route("/sync-inventory", post(sync_inventory))
        .route("/{marketplace}/auth-url", get(auth_url))
        .route("/{marketplace}/callback", post(oauth_callback))
        .route("/{marketplace}/disconnect", delete(disconnect))
}
