#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use govtrust_api::auth::jwt::{generate_access_token, JwtConfig};
use govtrust_api::config::ServerConfig;
use govtrust_api::router::build_app_router;
use govtrust_api::state::AppState;
use govtrust_core::identity::Identity;
use govtrust_core::store::memory::InMemoryStore;
use govtrust_core::store::DocumentStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and a fixed signing secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        seed_demo_data: false,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over an in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: Arc<InMemoryStore>) -> Router {
    build_test_app_with(store)
}

/// Like [`build_test_app`] but over any store implementation.
pub fn build_test_app_with(store: Arc<dyn DocumentStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid session token for `identity`, signed with the test secret.
pub fn token_for(identity: &Identity) -> String {
    generate_access_token(identity, &test_config().jwt).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Insert a project with the given score and status, returning its id.
pub async fn seed_project(store: &InMemoryStore, name: &str, score: i32, status: &str) -> String {
    use govtrust_core::store::{field_map, FieldValue, PROJECTS_COLLECTION};

    store
        .create(
            PROJECTS_COLLECTION,
            field_map([
                ("name", FieldValue::json(name)),
                ("department", FieldValue::json("Department of Testing")),
                ("trustScore", FieldValue::json(score)),
                ("status", FieldValue::json(status)),
                ("lastUpdated", FieldValue::ServerTimestamp),
            ]),
        )
        .await
        .unwrap()
}
