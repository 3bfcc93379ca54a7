//! Organization settings persistence on the `organization_settings` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use icm_core::{OrgSettings, OrganizationId};
use icm_gap::StoreError;

use super::{decode_error, store_error};
use crate::settings::{SettingsStore, StoredSettings};

#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    settings: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl SettingsRow {
    fn into_stored(self) -> Result<StoredSettings, StoreError> {
        Ok(StoredSettings {
            settings: serde_json::from_value(self.settings)
                .map_err(|e| decode_error("settings", e))?,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(
        &self,
        organization: &OrganizationId,
    ) -> Result<Option<StoredSettings>, StoreError> {
        sqlx::query_as::<_, SettingsRow>(
            "SELECT settings, updated_at FROM organization_settings WHERE organization_id = $1",
        )
        .bind(organization.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(SettingsRow::into_stored)
        .transpose()
    }

    async fn put(
        &self,
        organization: &OrganizationId,
        settings: &OrgSettings,
    ) -> Result<StoredSettings, StoreError> {
        let json = serde_json::to_value(settings)
            .map_err(|e| StoreError::Backend(format!("failed to serialize settings: {e}")))?;
        sqlx::query_as::<_, SettingsRow>(
            "INSERT INTO organization_settings (organization_id, settings, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (organization_id)
             DO UPDATE SET settings = EXCLUDED.settings, updated_at = EXCLUDED.updated_at
             RETURNING settings, updated_at",
        )
        .bind(organization.as_str())
        .bind(&json)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?
        .into_stored()
    }
}
