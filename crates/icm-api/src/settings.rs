//! # Organization Settings Store
//!
//! Persistence port for per-tenant [`OrgSettings`]. An organization with no
//! stored row reads as the defaults. Writes replace the whole document; the
//! merge of a patch happens in the route before the write.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use icm_core::{OrganizationId, OrgSettings};
use icm_gap::StoreError;

/// Settings as stored, with the time of the last write.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSettings {
    pub settings: OrgSettings,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored settings for `organization`, or `None` if never written.
    async fn get(&self, organization: &OrganizationId)
        -> Result<Option<StoredSettings>, StoreError>;

    /// Replace the settings for `organization`.
    async fn put(
        &self,
        organization: &OrganizationId,
        settings: &OrgSettings,
    ) -> Result<StoredSettings, StoreError>;
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    rows: RwLock<HashMap<OrganizationId, StoredSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(
        &self,
        organization: &OrganizationId,
    ) -> Result<Option<StoredSettings>, StoreError> {
        Ok(self.rows.read().get(organization).cloned())
    }

    async fn put(
        &self,
        organization: &OrganizationId,
        settings: &OrgSettings,
    ) -> Result<StoredSettings, StoreError> {
        let stored = StoredSettings {
            settings: settings.clone(),
            updated_at: Utc::now(),
        };
        self.rows.write().insert(organization.clone(), stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_core::IsoStandard;

    #[tokio::test]
    async fn settings_are_per_organization() {
        let store = MemorySettingsStore::new();
        let a = OrganizationId::new("org-a").unwrap();
        let b = OrganizationId::new("org-b").unwrap();
        assert!(store.get(&a).await.unwrap().is_none());

        let settings = OrgSettings {
            default_standard: Some(IsoStandard::Iso27001),
            ..OrgSettings::default()
        };
        store.put(&a, &settings).await.unwrap();

        assert_eq!(store.get(&a).await.unwrap().unwrap().settings, settings);
        assert!(store.get(&b).await.unwrap().is_none());
    }
}
