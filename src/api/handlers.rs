//! Route handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AuthContext, AuthError};
use crate::metrics::METRICS_CONTENT_TYPE;
use crate::services::{Artifact, MonitorSnapshot, PipelineStatus};

use super::error::ApiResult;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
}

#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub auth: &'static str,
    pub api: &'static str,
    pub health: &'static str,
    pub metrics: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ci: Vec<PipelineStatus>,
    pub artifacts: Vec<Artifact>,
    pub monitor: MonitorSnapshot,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub deployment_run_id: String,
}

/// `GET /` - service banner with an endpoint index.
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "ops-portal",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            auth: "/auth/login",
            api: "/api/status",
            health: "/healthz",
            metrics: "/metrics",
        },
    })
}

/// `GET /healthz` - liveness, no dependencies consulted.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /readyz` - readiness.
pub async fn readyz() -> Json<ReadyResponse> {
    Json(ReadyResponse { ready: true })
}

/// `POST /auth/login` - exchange credentials for a bearer token.
///
/// Missing fields, unknown users and wrong passwords all produce the
/// same 401 so responses do not reveal which part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AuthError::InvalidCredentials);
    };

    let credential = state
        .credentials
        .verify(&username, &password)
        .ok_or(AuthError::InvalidCredentials)?;

    let token = state
        .tokens
        .issue(&credential.username, &credential.roles, Utc::now().timestamp())?;

    Ok(Json(LoginResponse { token }))
}

/// `GET /api/status` - aggregate view of CI, artifacts and monitoring.
/// Requires the `ops` role.
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let ci = state.ci.pipelines().await?;
    let artifacts = state.artifacts.artifacts().await?;
    let monitor = state.monitor.snapshot().await?;

    Ok(Json(StatusResponse {
        ci,
        artifacts,
        monitor,
    }))
}

/// `POST /api/deploy` - trigger a production deployment run. Requires
/// the `admin` role.
pub async fn deploy(
    State(state): State<AppState>,
    context: AuthContext,
) -> ApiResult<(StatusCode, Json<DeployResponse>)> {
    let deployment_run_id = state.ci.trigger("prod").await?;
    info!(subject = %context.subject, run_id = %deployment_run_id, "deployment triggered");

    Ok((
        StatusCode::ACCEPTED,
        Json(DeployResponse { deployment_run_id }),
    ))
}

/// `GET /metrics` - Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.metrics.to_prometheus(),
    )
}
