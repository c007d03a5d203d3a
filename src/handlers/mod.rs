// Handlers module
// HTTP handlers for the hit counter API

pub mod hits;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    db::HitCounterStore,
    error::{ApiError, ApiResult},
    models::{HealthResponse, WelcomeResponse},
};

pub const HOME_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const HITS_PATH: &str = "/hits";

/// Welcome handler
/// GET /
pub async fn home(State(store): State<Arc<HitCounterStore>>) -> impl IntoResponse {
    // Best effort: a dropped hit is already logged by the store.
    // If the request times out mid-upsert the hit may or may not be committed.
    store.increment(HOME_PATH).await;

    (StatusCode::OK, Json(WelcomeResponse::new()))
}

/// Health check handler
/// Returns a static "healthy" status for monitoring and load balancers
pub async fn health_check(State(store): State<Arc<HitCounterStore>>) -> impl IntoResponse {
    // Same timeout caveat as `home`
    store.increment(HEALTH_PATH).await;

    (StatusCode::OK, Json(HealthResponse::healthy()))
}

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> ApiResult<()> {
    Err(ApiError::not_found(format!("Route {}", uri.path())))
}
