//! Per-endpoint request counters with Prometheus text exposition.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use dashmap::DashMap;

/// Content type for the text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Lock-free request counters keyed by request path.
#[derive(Debug, Default)]
pub struct HttpMetrics {
    requests: DashMap<String, u64>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `endpoint`.
    pub fn record(&self, endpoint: &str) {
        *self.requests.entry(endpoint.to_string()).or_insert(0) += 1;
    }

    /// Render all counters in Prometheus text format, one series per
    /// endpoint, sorted so output is stable across scrapes.
    pub fn to_prometheus(&self) -> String {
        let mut series: Vec<(String, u64)> = self
            .requests
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        series.sort();

        let mut out = String::from(
            "# HELP ops_http_requests_total Count HTTP requests\n\
             # TYPE ops_http_requests_total counter\n",
        );
        for (endpoint, count) in series {
            let _ = writeln!(
                out,
                "ops_http_requests_total{{endpoint=\"{endpoint}\"}} {count}"
            );
        }
        out
    }
}

/// Middleware that counts a matched request by path before it is
/// handled.
///
/// Attached with `route_layer` outside the auth guards: requests the
/// guards reject still count, while unmatched paths never reach this
/// layer. The counter map only ever holds configured endpoints, never
/// arbitrary client-supplied paths.
pub async fn track_requests(
    State(metrics): State<Arc<HttpMetrics>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    metrics.record(request.uri().path());
    next.run(request).await
}
