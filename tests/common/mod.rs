//! Shared test harness: the full router wired over an in-memory SQLite store.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use dsp_gateway::app::AppContext;
use dsp_gateway::auth::TokenService;
use dsp_gateway::config::{AppConfig, AuthConfig};
use dsp_gateway::database;
use dsp_gateway::server::HttpServer;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Baseline configuration for in-process tests.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    // One pooled connection keeps the in-memory database consistent.
    config.database.max_connections = 1;
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.upstream.timeout_seconds = 1;
    config.upstream.connect_timeout_seconds = 1;
    config
}

/// Build the application router exactly as `main` does, minus the listener.
pub async fn build_router(config: AppConfig) -> Router {
    let config = Arc::new(config);
    let db = Arc::new(database::init_database(&config.database).await.unwrap());
    database::run_migrations(&db).await.unwrap();

    let context = Arc::new(AppContext::from_config(config.clone(), db).unwrap());
    HttpServer::new(config.server.clone(), context).into_router()
}

/// Mint a token signed with the test secret; a negative TTL yields an
/// already-expired token.
pub fn issue_token(subject: &str, ttl_minutes: i64) -> String {
    let service = TokenService::new(&AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_algorithm: "HS256".to_string(),
        token_ttl_minutes: ttl_minutes,
    })
    .unwrap();
    service.issue(subject, None).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up a user and return the issued access token.
pub async fn signup_user(router: &Router, email: &str, password: &str) -> String {
    let response = send(
        router,
        json_request(
            "POST",
            "/signup",
            &serde_json::json!({ "email": email, "password": password }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status().as_u16(), 201);

    let body = response_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}
