//! Where commands read the catalog and evidence from.
//!
//! With `DATABASE_URL` set, everything comes from Postgres. Otherwise the
//! seed catalog is loaded into memory together with an optional evidence
//! fixture.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use icm_api::{db, AppConfig, AppState};
use icm_catalog::seed_catalog;
use icm_gap::MemoryStore;

use crate::fixture::load_evidence;

/// Open the data source for a command.
pub async fn open(config: &AppConfig, evidence: Option<&Path>) -> Result<AppState> {
    match config.database_url.as_deref() {
        Some(url) => {
            if evidence.is_some() {
                tracing::warn!("DATABASE_URL is set; ignoring --evidence");
            }
            let pool = db::init_pool(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            Ok(AppState::with_pool(config.clone(), pool))
        }
        None => Ok(AppState::in_memory(config.clone(), Arc::new(memory_store(evidence)?))),
    }
}

/// The seed catalog plus the evidence in `evidence`, if given.
pub fn memory_store(evidence: Option<&Path>) -> Result<MemoryStore> {
    let store = MemoryStore::with_catalog(seed_catalog()?);
    if let Some(path) = evidence {
        let set = load_evidence(path)?;
        store
            .load_evidence(set)
            .with_context(|| format!("invalid evidence in {}", path.display()))?;
    }
    Ok(store)
}
