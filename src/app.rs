use axum::{routing::get, Router};
use std::{sync::Arc, time::Duration};

use crate::{
    db::HitCounterStore,
    handlers::{health_check, hits::get_hits, home, route_not_found, HEALTH_PATH, HITS_PATH, HOME_PATH},
    middleware::create_middleware_stack,
};

/// Create the Axum router with all endpoints and middleware.
///
/// `home` and `health_check` count their own hits; `get_hits` never does.
pub fn create_router(store: Arc<HitCounterStore>, request_timeout: Duration) -> Router {
    Router::new()
        .route(HOME_PATH, get(home))
        .route(HEALTH_PATH, get(health_check))
        .route(HITS_PATH, get(get_hits))
        .fallback(route_not_found)
        .with_state(store)
        .layer(create_middleware_stack(request_timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::TempDatabase;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        store: Arc<HitCounterStore>,
        _db: TempDatabase,
    }

    impl TestApp {
        async fn spawn() -> Self {
            let db = TempDatabase::new();
            let store = Arc::new(HitCounterStore::open(&db.config).await.unwrap());
            let router = create_router(Arc::clone(&store), Duration::from_secs(30));
            TestApp { router, store, _db: db }
        }

        async fn get(&self, path: &str) -> (StatusCode, Value) {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[tokio::test]
    async fn test_home_endpoint() {
        let app = TestApp::spawn().await;

        let (status, body) = app.get("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the Hit Counter API");
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = TestApp::spawn().await;

        let (status, body) = app.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_hits_initial_state() {
        let app = TestApp::spawn().await;

        let (status, body) = app.get("/hits").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hits": {}, "total_hits": 0 }));
    }

    #[tokio::test]
    async fn test_hit_counter_functionality() {
        let app = TestApp::spawn().await;

        app.get("/").await;
        app.get("/").await;
        app.get("/health").await;

        let (status, body) = app.get("/hits").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hits": { "/": 2, "/health": 1 }, "total_hits": 3 }));
    }

    #[tokio::test]
    async fn test_hits_endpoint_not_counted() {
        let app = TestApp::spawn().await;

        for _ in 0..3 {
            app.get("/hits").await;
        }

        let (status, body) = app.get("/hits").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hits": {}, "total_hits": 0 }));
        assert!(!app.store.snapshot().await.contains_key("/hits"));
    }

    #[tokio::test]
    async fn test_mixed_endpoint_access_pattern() {
        let app = TestApp::spawn().await;

        app.get("/").await;
        app.get("/health").await;
        app.get("/").await;
        app.get("/hits").await;
        app.get("/hits").await;
        app.get("/hits").await;
        app.get("/health").await;

        let (_, body) = app.get("/hits").await;

        assert_eq!(body, json!({ "hits": { "/": 2, "/health": 2 }, "total_hits": 4 }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_counted() {
        let app = TestApp::spawn().await;

        let (status, body) = app.get("/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Route /missing not found");
        assert!(app.store.snapshot().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_are_all_counted() {
        let app = TestApp::spawn().await;

        let requests: Vec<_> = (0..40)
            .map(|_| {
                let router = app.router.clone();
                tokio::spawn(async move {
                    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
                    router.oneshot(request).await.unwrap().status()
                })
            })
            .collect();

        for request in requests {
            assert_eq!(request.await.unwrap(), StatusCode::OK);
        }

        let (_, body) = app.get("/hits").await;
        assert_eq!(body, json!({ "hits": { "/health": 40 }, "total_hits": 40 }));
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_get() {
        let app = TestApp::spawn().await;

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/hits")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(app.store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_endpoints_survive_store_failure() {
        let app = TestApp::spawn().await;
        app.get("/").await;

        app.store.close().await;

        let (status, body) = app.get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = app.get("/hits").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hits": {}, "total_hits": 0 }));
    }
}
