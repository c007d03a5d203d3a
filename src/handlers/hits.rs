// Hit counter handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::{db::HitCounterStore, models::HitsReport};

/// Report hit counts for every tracked endpoint
/// GET /hits
/// Never counted itself; an unreadable store is reported as no hits
pub async fn get_hits(State(store): State<Arc<HitCounterStore>>) -> impl IntoResponse {
    let report = HitsReport::from_counts(store.snapshot().await);

    info!("Reporting {} hits across {} endpoints", report.total_hits, report.hits.len());
    (StatusCode::OK, Json(report))
}
