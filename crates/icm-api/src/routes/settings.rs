//! # Organization Settings API
//!
//! `GET /v1/settings` returns the caller's settings, falling back to the
//! defaults when none were stored. `PATCH /v1/settings` merges the provided
//! keys over the current value, validates the result and stores it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use icm_core::{OrgSettings, OrgSettingsPatch, OrganizationId};

use crate::error::AppError;
use crate::extractors::{extract_json, OrgContext};
use crate::settings::StoredSettings;
use crate::state::AppState;

/// Settings of one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[schema(value_type = String)]
    pub organization_id: OrganizationId,
    #[schema(value_type = Object)]
    pub settings: OrgSettings,
    /// Last write, or `null` while the defaults are in effect.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsResponse {
    fn new(organization_id: OrganizationId, stored: Option<StoredSettings>) -> Self {
        match stored {
            Some(stored) => Self {
                organization_id,
                settings: stored.settings,
                updated_at: Some(stored.updated_at),
            },
            None => Self {
                organization_id,
                settings: OrgSettings::default(),
                updated_at: None,
            },
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/settings", get(get_settings).patch(patch_settings))
}

/// GET /v1/settings
#[utoipa::path(
    get,
    path = "/v1/settings",
    responses(
        (status = 200, description = "Current organization settings", body = SettingsResponse),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    OrgContext { organization_id }: OrgContext,
) -> Result<Json<SettingsResponse>, AppError> {
    let stored = state.settings.get(&organization_id).await?;
    Ok(Json(SettingsResponse::new(organization_id, stored)))
}

/// PATCH /v1/settings
#[utoipa::path(
    patch,
    path = "/v1/settings",
    request_body(content = Object, description = "Settings keys to overwrite"),
    responses(
        (status = 200, description = "Merged and stored settings", body = SettingsResponse),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed body or invalid merged settings", body = crate::error::ErrorBody),
    ),
    tag = "settings"
)]
pub async fn patch_settings(
    State(state): State<AppState>,
    OrgContext { organization_id }: OrgContext,
    body: Result<Json<OrgSettingsPatch>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let patch = extract_json(body)?;
    let current = state.settings.get(&organization_id).await?;
    if patch.is_empty() {
        return Ok(Json(SettingsResponse::new(organization_id, current)));
    }

    let base = current.map(|s| s.settings).unwrap_or_default();
    let merged = base.merge(&patch)?;
    let stored = state.settings.put(&organization_id, &merged).await?;
    tracing::info!(org = %organization_id, "organization settings updated");

    Ok(Json(SettingsResponse::new(organization_id, Some(stored))))
}
