//! # Application State
//!
//! Shared handles cloned into every handler. The engine and the browser
//! ports are trait objects, so the same router runs against the in-memory
//! seed catalog or the Postgres adapter.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use icm_gap::{
    ClauseCatalogStore, CrossReferenceBrowser, CrossReferenceStore, GapAnalysisEngine,
    MemoryStore,
};

use crate::config::AppConfig;
use crate::db::{PgSettingsStore, PgStore};
use crate::settings::{MemorySettingsStore, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: GapAnalysisEngine,
    catalog: Arc<dyn ClauseCatalogStore>,
    cross_refs: Arc<dyn CrossReferenceStore>,
    pub settings: Arc<dyn SettingsStore>,
    /// Present when running against Postgres; used by the readiness probe.
    pub db_pool: Option<PgPool>,
    /// Present when metrics are enabled; renders `/metrics`.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("db_pool", &self.db_pool.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State over an in-memory store with in-memory settings.
    pub fn in_memory(config: AppConfig, store: Arc<MemoryStore>) -> Self {
        let engine =
            GapAnalysisEngine::from_store(store.clone()).with_ordering(config.clause_ordering);
        Self {
            config: Arc::new(config),
            engine,
            catalog: store.clone(),
            cross_refs: store,
            settings: Arc::new(MemorySettingsStore::new()),
            db_pool: None,
            metrics: None,
        }
    }

    /// State over a migrated Postgres pool.
    pub fn with_pool(config: AppConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        let engine =
            GapAnalysisEngine::from_store(store.clone()).with_ordering(config.clause_ordering);
        Self {
            config: Arc::new(config),
            engine,
            catalog: store.clone(),
            cross_refs: store,
            settings: Arc::new(PgSettingsStore::new(pool.clone())),
            db_pool: Some(pool),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// A fresh browser whose memo lives for one request.
    pub fn browser(&self) -> CrossReferenceBrowser {
        CrossReferenceBrowser::new(self.catalog.clone(), self.cross_refs.clone())
    }
}
