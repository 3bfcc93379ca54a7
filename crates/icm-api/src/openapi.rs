//! # OpenAPI Specification Assembly
//!
//! Collects the `#[utoipa::path]` handlers and response schemas into one
//! document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ICM API",
        description = "ISO compliance management: gap analysis of organization evidence against the ISO management system standards, and browsing of cross-standard clause mappings.\n\nEvery `/v1/*` endpoint requires the `X-Organization-Id` header. Health probes and `/metrics` do not."
    ),
    paths(
        crate::routes::gap::get_gap_analysis,
        crate::routes::gap::get_opportunities,
        crate::routes::cross_references::get_matrix,
        crate::routes::cross_references::get_overlap,
        crate::routes::cross_references::get_clause_references,
        crate::routes::settings::get_settings,
        crate::routes::settings::patch_settings,
    ),
    components(schemas(
        icm_gap::GapAnalysisSummary,
        icm_gap::StandardGapAnalysis,
        icm_gap::TopLevelClauseGap,
        icm_gap::ClauseGapData,
        icm_gap::CoverageStatus,
        icm_gap::IntegrationOpportunity,
        icm_gap::CrossReferenceMatrix,
        icm_gap::StandardOverlap,
        icm_gap::OverlapReference,
        icm_gap::CrossRefItem,
        crate::routes::settings::SettingsResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "gap_analysis", description = "Per-clause coverage of organization evidence"),
        (name = "cross_references", description = "Cross-standard clause mappings"),
        (name = "settings", description = "Per-organization settings"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/v1/gap-analysis",
            "/v1/gap-analysis/opportunities",
            "/v1/cross-references/matrix",
            "/v1/cross-references/overlap",
            "/v1/clauses/{clause_id}/cross-references",
            "/v1/settings",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_contains_response_schemas() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        for name in ["GapAnalysisSummary", "CoverageStatus", "StandardOverlap", "ErrorBody"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("ICM API"));
    }
}
