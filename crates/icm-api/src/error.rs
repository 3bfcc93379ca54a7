//! # API Error Types
//!
//! [`AppError`] implements `IntoResponse`, mapping store, validation and
//! database failures to HTTP status codes with a JSON body of the form
//! `{"error": {"code", "message"}}`. Server-side messages are logged and
//! replaced with a generic text before they reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use icm_core::IcmError;
use icm_gap::StoreError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `"UNAUTHORIZED"`.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input parsed but failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be deserialized (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or unusable tenant context (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500). Logged, never returned to the client.
    #[error("internal error: {0}")]
    Internal(String),

    /// A backing service is unreachable or not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::ServiceUnavailable(_) => "A backing service is unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<IcmError> for AppError {
    fn from(err: IcmError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => Self::ServiceUnavailable(err.to_string()),
            StoreError::Backend(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::from(crate::db::store_error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_codes() {
        let cases = [
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                AppError::BadRequest("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "BAD_REQUEST",
            ),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[tokio::test]
    async fn internal_message_is_redacted() {
        let (status, body) =
            body_json(AppError::Internal("connection string postgres://secret".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) =
            body_json(AppError::Unauthorized("organization context missing".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("organization context missing"));
    }

    #[test]
    fn store_errors_map_by_kind() {
        assert!(matches!(
            AppError::from(StoreError::Unavailable),
            AppError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Backend("boom".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn validation_errors_map_to_422() {
        let err = AppError::from(IcmError::UnknownStandard("ISO0".into()));
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
