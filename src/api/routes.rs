//! Router assembly.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::{RoleGuard, RoleSet, require_roles};
use crate::metrics::track_requests;

use super::handlers;
use super::state::AppState;

/// Build the complete router.
///
/// Three sub-routers with distinct access levels are merged: public
/// (banner, probes, metrics, login), `ops`-gated status, and
/// `admin`-gated deploy. The guards and the request counter are
/// attached with `route_layer`, so an unmatched path falls through to
/// a plain 404 without touching auth and without minting a counter
/// series. Tracing wraps the whole tree, fallback included.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let ops_guard = RoleGuard::new(state.tokens.clone(), RoleSet::new(["ops"]));
    let admin_guard = RoleGuard::new(state.tokens.clone(), RoleSet::new(["admin"]));

    let public = Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::metrics))
        .route("/auth/login", post(handlers::login))
        .with_state(state.clone());

    let ops = Router::new()
        .route("/api/status", get(handlers::status))
        .route_layer(from_fn_with_state(ops_guard, require_roles))
        .with_state(state.clone());

    let admin = Router::new()
        .route("/api/deploy", post(handlers::deploy))
        .route_layer(from_fn_with_state(admin_guard, require_roles))
        .with_state(state.clone());

    Router::new()
        .merge(public)
        .merge(ops)
        .merge(admin)
        .route_layer(from_fn_with_state(state.metrics.clone(), track_requests))
        .layer(trace_layer)
}
