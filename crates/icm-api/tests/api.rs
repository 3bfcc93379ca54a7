//! # Integration Tests for icm-api
//!
//! Drives the router with `tower::ServiceExt::oneshot` over an in-memory
//! store seeded with the full catalog and a small amount of evidence for
//! one organization.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use icm_api::{app, AppConfig, AppState};
use icm_catalog::seed_catalog;
use icm_core::{
    ChecklistId, ClauseId, ClauseNumber, Confidence, DocumentId, DocumentStatus, IsoStandard,
    OrganizationId,
};
use icm_gap::{Checklist, ChecklistItem, DocumentClassification, EvidenceDocument, MemoryStore};

const ORG_A: &str = "org-a";
const ORG_B: &str = "org-b";

fn clause(code: IsoStandard, number: &str) -> ClauseId {
    ClauseId::for_clause(code, &ClauseNumber::new(number).unwrap())
}

/// Seed catalog plus a verified document and a compliant checklist item on
/// ISO 9001 4.1 for `ORG_A`.
fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::with_catalog(seed_catalog().unwrap());
    let org = OrganizationId::new(ORG_A).unwrap();
    let target = clause(IsoStandard::Iso9001, "4.1");

    let document = DocumentId::new();
    store.insert_document(EvidenceDocument {
        id: document,
        organization_id: org.clone(),
        project_id: None,
        status: DocumentStatus::Active,
    });
    store.insert_classification(DocumentClassification {
        document_id: document,
        standard_clause_id: target,
        is_verified: true,
        confidence: Confidence::new(0.9).unwrap(),
    });

    let checklist = ChecklistId::new();
    store.insert_checklist(Checklist {
        id: checklist,
        organization_id: org,
        project_id: None,
    });
    store
        .insert_item(ChecklistItem {
            checklist_id: checklist,
            standard_clause_id: Some(target),
            is_compliant: Some(true),
            field_config: None,
            response: None,
        })
        .unwrap();

    Arc::new(store)
}

fn test_app() -> axum::Router {
    app(AppState::in_memory(AppConfig::default(), seeded_store()))
}

fn get(uri: &str, org: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(org) = org {
        builder = builder.header("X-Organization-Id", org);
    }
    builder.body(Body::empty()).unwrap()
}

fn patch(uri: &str, org: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("X-Organization-Id", org)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = body_string(response).await;
    (status, serde_json::from_str(&body).unwrap())
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(get("/health/liveness", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_without_database() {
    let response = test_app()
        .oneshot(get("/health/readiness", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_without_recorder_is_not_found() {
    let response = test_app().oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_renders_prometheus_text() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state =
        AppState::in_memory(AppConfig::default(), seeded_store()).with_metrics(Some(handle));
    let response = app(state).oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
}

// -- Tenant Context -----------------------------------------------------------

#[tokio::test]
async fn test_missing_organization_header_is_401() {
    for uri in [
        "/v1/gap-analysis",
        "/v1/gap-analysis/opportunities",
        "/v1/cross-references/matrix",
        "/v1/cross-references/overlap",
        "/v1/settings",
    ] {
        let (status, body) = send(test_app(), get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("organization context missing"));
    }
}

// -- Gap Analysis -------------------------------------------------------------

#[tokio::test]
async fn test_gap_analysis_scores_caller_evidence() {
    let (status, body) = send(
        test_app(),
        get("/v1/gap-analysis?standard=ISO9001", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["covered"], 1);
    assert_eq!(body["standards"].as_array().unwrap().len(), 1);

    let standard = &body["standards"][0];
    assert_eq!(standard["code"], "ISO9001");
    let four = standard["clauses"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["clauseNumber"] == "4")
        .unwrap();
    assert_eq!(four["status"], "PARTIAL");
    let four_one = four["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["clauseNumber"] == "4.1")
        .unwrap();
    assert_eq!(four_one["status"], "COVERED");
    assert_eq!(four_one["docCount"], 1);
    assert_eq!(four_one["checklistCompliantCount"], 1);
    assert_eq!(four_one["checklistTotalCount"], 1);
    // One EQUIVALENT edge to each of the other six standards.
    assert_eq!(four_one["crossRefCount"], 6);
}

#[tokio::test]
async fn test_gap_analysis_is_tenant_isolated() {
    let (status, body) = send(test_app(), get("/v1/gap-analysis", Some(ORG_B))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["covered"], 0);
    assert_eq!(body["partial"], 0);
    assert_eq!(body["overallCoveragePercent"], 0);
    assert_eq!(
        body["standards"].as_array().unwrap().len(),
        IsoStandard::all().len()
    );
}

#[tokio::test]
async fn test_gap_analysis_project_filter_excludes_unowned_evidence() {
    let (status, body) = send(
        test_app(),
        get("/v1/gap-analysis?standard=ISO9001&project=p-1", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["covered"], 0);
}

#[tokio::test]
async fn test_gap_analysis_rejects_unknown_standard() {
    let (status, body) = send(
        test_app(),
        get("/v1/gap-analysis?standard=ISO1234", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_gap_analysis_is_idempotent() {
    let app = test_app();
    let first = body_string(
        app.clone()
            .oneshot(get("/v1/gap-analysis", Some(ORG_A)))
            .await
            .unwrap(),
    )
    .await;
    let second = body_string(
        app.oneshot(get("/v1/gap-analysis", Some(ORG_A)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_opportunities_list_uncovered_referenced_clauses() {
    let (status, body) = send(
        test_app(),
        get("/v1/gap-analysis/opportunities?standard=ISO9001", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i["status"] != "COVERED"));
    assert!(items.iter().all(|i| i["crossRefCount"].as_u64().unwrap() > 0));
    assert!(items.iter().all(|i| i["clauseNumber"] != "4.1"));
}

// -- Cross-Reference Browser --------------------------------------------------

#[tokio::test]
async fn test_matrix_lists_active_standards() {
    let (status, body) = send(
        test_app(),
        get("/v1/cross-references/matrix", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["standards"].as_array().unwrap().len(), 7);
    assert_eq!(body["clauses"].as_array().unwrap().len(), 7 * 7);
}

#[tokio::test]
async fn test_overlap_details_cover_every_pair() {
    let (status, body) = send(
        test_app(),
        get("/v1/cross-references/overlap", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"].as_object().unwrap().len(), 21);
    assert_eq!(body["matrix"][0][0], 7);
}

#[tokio::test]
async fn test_clause_drill_down() {
    let id = clause(IsoStandard::Iso9001, "4.1");
    let (status, body) = send(
        test_app(),
        get(&format!("/v1/clauses/{id}/cross-references"), Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert!(items.iter().all(|i| i["mappingType"] == "EQUIVALENT"));
    assert!(items.iter().all(|i| i["clauseNumber"] == "4.1"));
    assert!(items.iter().all(|i| i["standardCode"] != "ISO9001"));
}

#[tokio::test]
async fn test_clause_drill_down_rejects_malformed_id() {
    let (status, _) = send(
        test_app(),
        get("/v1/clauses/not-a-uuid/cross-references", Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_clause_drill_down_unknown_clause_is_empty() {
    let id = ClauseId::new();
    let (status, body) = send(
        test_app(),
        get(&format!("/v1/clauses/{id}/cross-references"), Some(ORG_A)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// -- Settings -----------------------------------------------------------------

#[tokio::test]
async fn test_settings_default_until_written() {
    let (status, body) = send(test_app(), get("/v1/settings", Some(ORG_A))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organizationId"], ORG_A);
    assert_eq!(body["settings"]["expiryWarningDays"], 30);
    assert!(body["updatedAt"].is_null());
}

#[tokio::test]
async fn test_settings_patch_merges_and_persists() {
    let app = test_app();
    let (status, body) = send(
        app.clone(),
        patch(
            "/v1/settings",
            ORG_A,
            r#"{"expiryWarningDays": 60, "defaultStandard": "ISO27001"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["expiryWarningDays"], 60);
    assert_eq!(body["settings"]["defaultStandard"], "ISO27001");
    assert_eq!(body["settings"]["autoClassification"], true);
    assert!(body["updatedAt"].is_string());

    let (_, reread) = send(app.clone(), get("/v1/settings", Some(ORG_A))).await;
    assert_eq!(reread["settings"], body["settings"]);

    // Another tenant still sees the defaults.
    let (_, other) = send(app, get("/v1/settings", Some(ORG_B))).await;
    assert_eq!(other["settings"]["expiryWarningDays"], 30);
}

#[tokio::test]
async fn test_settings_patch_rejects_invalid_values() {
    let app = test_app();
    let (status, body) = send(
        app.clone(),
        patch("/v1/settings", ORG_A, r#"{"expiryWarningDays": 0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, unchanged) = send(app, get("/v1/settings", Some(ORG_A))).await;
    assert!(unchanged["updatedAt"].is_null());
}

#[tokio::test]
async fn test_settings_patch_rejects_malformed_body() {
    let (status, body) = send(
        test_app(),
        patch("/v1/settings", ORG_A, r#"{"expiryWarningDays": "soon"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let (status, body) = send(test_app(), get("/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/gap-analysis"].is_object());
}
