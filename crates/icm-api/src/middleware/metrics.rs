//! # Request Metrics
//!
//! Records `icm_http_requests_total` and
//! `icm_http_request_duration_seconds`, labelled by method, matched route
//! template and status. Using the route template keeps clause ids out of the
//! label set.
//!
//! Values go to whatever recorder is installed; without one the macros are
//! no-ops. The server installs the Prometheus recorder when metrics are
//! enabled.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Label used when a request matched no route.
const UNMATCHED: &str = "unmatched";

pub async fn track_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED.to_string(), |p| p.as_str().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let labels = [("method", method), ("path", path), ("status", status)];
    metrics::counter!("icm_http_requests_total", &labels).increment(1);
    metrics::histogram!("icm_http_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());

    response
}
