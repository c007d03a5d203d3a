use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the `hits` table: how many times an endpoint has completed a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitRecord {
    pub endpoint: String,
    pub count: u64,
}

/// Body of `GET /hits`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitsReport {
    pub hits: BTreeMap<String, u64>,
    pub total_hits: u64,
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub status: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HitsReport {
    /// Build a report from a snapshot, deriving the total across all endpoints
    pub fn from_counts(hits: BTreeMap<String, u64>) -> Self {
        let total_hits = hits.values().sum();
        HitsReport { hits, total_hits }
    }
}

impl WelcomeResponse {
    pub fn new() -> Self {
        WelcomeResponse {
            message: "Welcome to the Hit Counter API".to_string(),
            status: "success".to_string(),
        }
    }
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthResponse {
    pub fn healthy() -> Self {
        HealthResponse {
            status: "healthy".to_string(),
        }
    }
}
