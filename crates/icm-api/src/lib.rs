//! # icm-api: Axum API Services
//!
//! HTTP surface for ICM, built on Axum/Tower/Tokio.
//!
//! ## Routes
//!
//! - `/v1/gap-analysis`, `/v1/gap-analysis/opportunities`: coverage of the
//!   caller's evidence per standard and clause.
//! - `/v1/cross-references/matrix`, `/v1/cross-references/overlap`,
//!   `/v1/clauses/{clause_id}/cross-references`: the cross-reference browser.
//! - `/v1/settings`: organization settings, merged on PATCH.
//! - `/health/liveness`, `/health/readiness`, `/metrics`, `/openapi.json`:
//!   operational endpoints, no organization header required.
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → metrics middleware (when enabled) → handler
//!
//! ## Crate Policy
//!
//! - Sits at the top of the library DAG; depends on every other `icm-*` crate.
//! - No scoring logic in handlers; they delegate to `icm-gap`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod settings;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower_http::trace::TraceLayer;

use icm_catalog::seed_catalog;
use icm_gap::MemoryStore;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use error::AppError;
pub use state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .merge(routes::gap::router())
        .merge(routes::cross_references::router())
        .merge(routes::settings::router())
        .layer(DefaultBodyLimit::max(64 * 1024));

    if state.config.metrics_enabled {
        api = api.layer(from_fn(middleware::metrics::track_metrics));
    }

    let operational = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(prometheus_metrics))
        .merge(openapi::router());

    Router::new()
        .merge(operational)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build state from `config`, bind, and serve until Ctrl-C.
///
/// With `database_url` set the pool is connected and migrated; otherwise the
/// seed catalog is served from memory with no tenant evidence.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let metrics = if config.metrics_enabled {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url).await?;
            AppState::with_pool(config.clone(), pool)
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; serving the seed catalog from memory. \
                 Settings will not survive restarts."
            );
            let store = MemoryStore::with_catalog(seed_catalog()?);
            AppState::in_memory(config.clone(), Arc::new(store))
        }
    }
    .with_metrics(metrics);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, ordering = config.clause_ordering.as_str(), "ICM API listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("ICM API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Checks the database when one is configured.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }
    (StatusCode::OK, "ready").into_response()
}

/// GET /metrics: Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
