//! # Custom Extractors
//!
//! Tenant context from the `X-Organization-Id` header and a JSON body
//! helper that maps deserialization failures to [`AppError::BadRequest`].

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Json;

use icm_core::OrganizationId;

use crate::error::AppError;

/// Header carrying the caller's organization.
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// The tenant a request acts for.
///
/// The value is trusted as given; authenticating it is the job of whatever
/// sits in front of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext {
    pub organization_id: OrganizationId,
}

impl<S: Send + Sync> FromRequestParts<S> for OrgContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let organization_id = OrganizationId::new(raw.trim())
            .map_err(|_| AppError::Unauthorized("organization context missing".into()))?;
        Ok(Self { organization_id })
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
