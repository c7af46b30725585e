//! Test utilities and common setup.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use ops_portal::api::{self, AppState};
use ops_portal::auth::AuthConfig;
use ops_portal::services::{PipelineService, PipelineStatus};

/// Create a test AuthConfig with a fixed secret and the default fixture
/// users (alice with ops, admin with admin and ops).
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret_key: "test-secret-key".to_string(),
        jwt_issuer: "ops-portal-test".to_string(),
        jwt_audience: "ops-test".to_string(),
        ..AuthConfig::default()
    }
}

/// Create a test application with the bundled fixture backends.
pub fn test_app() -> Router {
    api::create_router(AppState::new(test_auth_config()))
}

/// Pipeline backend whose calls always fail.
pub struct FailingPipelines;

#[async_trait]
impl PipelineService for FailingPipelines {
    async fn pipelines(&self) -> Result<Vec<PipelineStatus>> {
        anyhow::bail!("ci backend unreachable")
    }

    async fn trigger(&self, _environment: &str) -> Result<String> {
        anyhow::bail!("ci backend unreachable")
    }
}

/// Create a test application whose CI backend always fails.
pub fn test_app_with_failing_pipelines() -> Router {
    let state = AppState::new(test_auth_config()).with_pipelines(Arc::new(FailingPipelines));
    api::create_router(state)
}

/// Log in through the API and return the bearer token.
pub async fn login_token(app: Router, username: &str, password: &str) -> String {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "username": username,
                        "password": password
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    json["token"].as_str().unwrap().to_string()
}
