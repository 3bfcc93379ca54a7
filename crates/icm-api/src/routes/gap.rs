//! # Gap Analysis API
//!
//! `GET /v1/gap-analysis` scores the caller's evidence against every active
//! standard (or one, with `?standard=`), optionally restricted to one
//! project's evidence. `GET /v1/gap-analysis/opportunities` lists uncovered
//! clauses that have cross-references, most connected first.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use icm_core::{IsoStandard, OrganizationId, ProjectId};
use icm_gap::{GapAnalysisQuery, GapAnalysisSummary, IntegrationOpportunity};

use crate::error::AppError;
use crate::extractors::OrgContext;
use crate::state::AppState;

/// Query parameters shared by both gap analysis endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GapAnalysisParams {
    /// Restrict to one standard code, e.g. `ISO9001`.
    pub standard: Option<String>,
    /// Restrict evidence to one project.
    pub project: Option<String>,
}

impl GapAnalysisParams {
    fn into_query(self, organization_id: OrganizationId) -> Result<GapAnalysisQuery, AppError> {
        let standard = self
            .standard
            .as_deref()
            .map(str::parse::<IsoStandard>)
            .transpose()?;
        let project = self.project.map(ProjectId::new).transpose()?;
        Ok(GapAnalysisQuery::for_organization(organization_id)
            .with_standard(standard)
            .with_project(project))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/gap-analysis", get(get_gap_analysis))
        .route("/v1/gap-analysis/opportunities", get(get_opportunities))
}

/// GET /v1/gap-analysis
#[utoipa::path(
    get,
    path = "/v1/gap-analysis",
    params(GapAnalysisParams),
    responses(
        (status = 200, description = "Coverage per standard and clause", body = GapAnalysisSummary),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown standard code or blank project", body = crate::error::ErrorBody),
    ),
    tag = "gap_analysis"
)]
pub async fn get_gap_analysis(
    State(state): State<AppState>,
    OrgContext { organization_id }: OrgContext,
    Query(params): Query<GapAnalysisParams>,
) -> Result<Json<GapAnalysisSummary>, AppError> {
    let query = params.into_query(organization_id)?;
    let scope = scope_label(&query);

    let started = Instant::now();
    let summary = state.engine.compute(&query).await?;

    metrics::counter!("icm_gap_analyses_total", "standard" => scope.clone()).increment(1);
    metrics::histogram!("icm_gap_analysis_duration_seconds", "standard" => scope)
        .record(started.elapsed().as_secs_f64());

    Ok(Json(summary))
}

/// GET /v1/gap-analysis/opportunities
#[utoipa::path(
    get,
    path = "/v1/gap-analysis/opportunities",
    params(GapAnalysisParams),
    responses(
        (status = 200, description = "Uncovered clauses with cross-references", body = Vec<IntegrationOpportunity>),
        (status = 401, description = "Missing X-Organization-Id header", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown standard code or blank project", body = crate::error::ErrorBody),
    ),
    tag = "gap_analysis"
)]
pub async fn get_opportunities(
    State(state): State<AppState>,
    OrgContext { organization_id }: OrgContext,
    Query(params): Query<GapAnalysisParams>,
) -> Result<Json<Vec<IntegrationOpportunity>>, AppError> {
    let query = params.into_query(organization_id)?;
    Ok(Json(state.engine.opportunities(&query).await?))
}

fn scope_label(query: &GapAnalysisQuery) -> String {
    query
        .standard
        .map_or_else(|| "all".to_string(), |s| s.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> OrganizationId {
        OrganizationId::new("org-1").unwrap()
    }

    #[test]
    fn empty_params_query_everything() {
        let query = GapAnalysisParams::default().into_query(org()).unwrap();
        assert_eq!(query, GapAnalysisQuery::for_organization(org()));
        assert_eq!(scope_label(&query), "all");
    }

    #[test]
    fn params_parse_into_typed_filters() {
        let query = GapAnalysisParams {
            standard: Some("ISO27001".into()),
            project: Some("p-1".into()),
        }
        .into_query(org())
        .unwrap();
        assert_eq!(query.standard, Some(IsoStandard::Iso27001));
        assert_eq!(query.project_id.unwrap().as_str(), "p-1");
    }

    #[test]
    fn unknown_standard_is_a_validation_error() {
        let err = GapAnalysisParams {
            standard: Some("ISO1234".into()),
            project: None,
        }
        .into_query(org())
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
