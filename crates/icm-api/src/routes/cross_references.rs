//! # Cross-Reference Browser API
//!
//! Read models over the global catalog and cross-reference graph. Each
//! request gets its own [`icm_gap::CrossReferenceBrowser`], so memoized
//! reads never outlive the request. The organization header is still
//! required even though the data is not tenant-scoped.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use icm_core::ClauseId;
use icm_gap::{CrossRefItem, CrossReferenceMatrix, StandardOverlap};

use crate::error::AppError;
use crate::extractors::OrgContext;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/cross-references/matrix", get(get_matrix))
        .route("/v1/cross-references/overlap", get(get_overlap))
        .route(
            "/v1/clauses/{clause_id}/cross-references",
            get(get_clause_references),
        )
}

/// GET /v1/cross-references/matrix
#[utoipa::path(
    get,
    path = "/v1/cross-references/matrix",
    responses(
        (status = 200, description = "Top-level clauses of active standards and their edges", body = CrossReferenceMatrix),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
    ),
    tag = "cross_references"
)]
pub async fn get_matrix(
    State(state): State<AppState>,
    _org: OrgContext,
) -> Result<Json<CrossReferenceMatrix>, AppError> {
    Ok(Json(state.browser().matrix().await?))
}

/// GET /v1/cross-references/overlap
#[utoipa::path(
    get,
    path = "/v1/cross-references/overlap",
    responses(
        (status = 200, description = "Pairwise edge counts between active standards", body = StandardOverlap),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
    ),
    tag = "cross_references"
)]
pub async fn get_overlap(
    State(state): State<AppState>,
    _org: OrgContext,
) -> Result<Json<StandardOverlap>, AppError> {
    Ok(Json(state.browser().overlap().await?))
}

/// GET /v1/clauses/{clause_id}/cross-references
///
/// An unknown clause id has no edges and yields an empty list.
#[utoipa::path(
    get,
    path = "/v1/clauses/{clause_id}/cross-references",
    params(
        ("clause_id" = String, Path, description = "Clause UUID"),
    ),
    responses(
        (status = 200, description = "Edges touching the clause, seen from the other end", body = Vec<CrossRefItem>),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed clause id", body = crate::error::ErrorBody),
    ),
    tag = "cross_references"
)]
pub async fn get_clause_references(
    State(state): State<AppState>,
    _org: OrgContext,
    Path(clause_id): Path<String>,
) -> Result<Json<Vec<CrossRefItem>>, AppError> {
    let clause: ClauseId = clause_id.parse()?;
    let items = state.browser().clause_references(clause).await?;
    Ok(Json(items.as_ref().clone()))
}
