//! Postgres implementation of the four gap analysis store ports.
//!
//! Evidence queries filter by `organization_id` (and `project_id` when
//! given) in SQL. Catalog and cross-reference queries are global. Clause
//! lists are ordered with the `C` collation so Postgres returns the same
//! byte order as [`ClauseNumber`]'s derived `Ord`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use icm_catalog::{Clause, ClauseRef, CrossReference, Standard, StandardWithClauses};
use icm_core::{
    ChecklistId, ClauseId, ClauseNumber, Confidence, DocumentId, FieldConfig, FieldResponse,
    IsoStandard, MappingType, OrganizationId, ProjectId, StandardId,
};
use icm_gap::{
    ChecklistEvidenceStore, ChecklistItem, ClauseCatalogStore, CrossReferenceStore,
    DocumentClassification, DocumentEvidenceStore, StoreError,
};

use super::{decode_error, store_error};

/// Store backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct StandardRow {
    id: Uuid,
    code: String,
    name: String,
    is_active: bool,
}

impl StandardRow {
    fn into_standard(self) -> Result<Standard, StoreError> {
        Ok(Standard {
            id: StandardId(self.id),
            code: parse_code(&self.code)?,
            name: self.name,
            is_active: self.is_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClauseRow {
    id: Uuid,
    standard_id: Uuid,
    clause_number: String,
    title: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
}

impl ClauseRow {
    fn into_clause(self) -> Result<Clause, StoreError> {
        Ok(Clause {
            id: ClauseId(self.id),
            standard_id: StandardId(self.standard_id),
            clause_number: parse_number(&self.clause_number)?,
            title: self.title,
            description: self.description,
            parent_id: self.parent_id.map(ClauseId),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClauseRefRow {
    clause_id: Uuid,
    clause_number: String,
    title: String,
    standard_id: Uuid,
    code: String,
    name: String,
}

impl ClauseRefRow {
    fn into_ref(self) -> Result<ClauseRef, StoreError> {
        Ok(ClauseRef {
            clause_id: ClauseId(self.clause_id),
            clause_number: parse_number(&self.clause_number)?,
            title: self.title,
            standard_id: StandardId(self.standard_id),
            standard_code: parse_code(&self.code)?,
            standard_name: self.name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EdgeRow {
    source_clause_id: Uuid,
    target_clause_id: Uuid,
    mapping_type: String,
    notes: Option<String>,
}

impl EdgeRow {
    fn into_edge(self) -> Result<CrossReference, StoreError> {
        Ok(CrossReference {
            source_clause_id: ClauseId(self.source_clause_id),
            target_clause_id: ClauseId(self.target_clause_id),
            mapping_type: self
                .mapping_type
                .parse::<MappingType>()
                .map_err(|e| decode_error("mapping_type", e))?,
            notes: self.notes,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClassificationRow {
    document_id: Uuid,
    standard_clause_id: Uuid,
    is_verified: bool,
    confidence: f64,
}

impl ClassificationRow {
    fn into_classification(self) -> Result<DocumentClassification, StoreError> {
        Ok(DocumentClassification {
            document_id: DocumentId(self.document_id),
            standard_clause_id: ClauseId(self.standard_clause_id),
            is_verified: self.is_verified,
            confidence: Confidence::new(self.confidence)
                .map_err(|e| decode_error("confidence", e))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    checklist_id: Uuid,
    standard_clause_id: Option<Uuid>,
    is_compliant: Option<bool>,
    field_config: Option<serde_json::Value>,
    response: Option<serde_json::Value>,
}

impl ItemRow {
    /// Field config and response are informational here. A shape this
    /// build does not know is dropped with a warning instead of failing
    /// the tenant's whole read.
    fn into_item(self) -> ChecklistItem {
        let field_config = self
            .field_config
            .and_then(|raw| lenient::<FieldConfig>("field_config", self.checklist_id, raw));
        let response = self
            .response
            .and_then(|raw| lenient::<FieldResponse>("response", self.checklist_id, raw));
        ChecklistItem {
            checklist_id: ChecklistId(self.checklist_id),
            standard_clause_id: self.standard_clause_id.map(ClauseId),
            is_compliant: self.is_compliant,
            field_config,
            response,
        }
    }
}

fn lenient<T: serde::de::DeserializeOwned>(
    column: &str,
    checklist_id: Uuid,
    raw: serde_json::Value,
) -> Option<T> {
    match serde_json::from_value(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                %checklist_id,
                column,
                error = %e,
                "ignoring undecodable checklist item column"
            );
            None
        }
    }
}

fn parse_code(raw: &str) -> Result<IsoStandard, StoreError> {
    raw.parse().map_err(|e| decode_error("standard code", e))
}

fn parse_number(raw: &str) -> Result<ClauseNumber, StoreError> {
    ClauseNumber::new(raw).map_err(|e| decode_error("clause_number", e))
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

#[async_trait]
impl ClauseCatalogStore for PgStore {
    async fn active_standards_with_clauses(
        &self,
        code: Option<IsoStandard>,
    ) -> Result<Vec<StandardWithClauses>, StoreError> {
        let standards = sqlx::query_as::<_, StandardRow>(
            "SELECT id, code, name, is_active FROM standards
             WHERE is_active AND ($1::text IS NULL OR code = $1)
             ORDER BY code COLLATE \"C\"",
        )
        .bind(code.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let ids: Vec<Uuid> = standards.iter().map(|s| s.id).collect();
        let clauses = sqlx::query_as::<_, ClauseRow>(
            "SELECT id, standard_id, clause_number, title, description, parent_id
             FROM standard_clauses
             WHERE standard_id = ANY($1)
             ORDER BY clause_number COLLATE \"C\"",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let mut by_standard: HashMap<StandardId, Vec<Clause>> = HashMap::new();
        for row in clauses {
            let clause = row.into_clause()?;
            by_standard.entry(clause.standard_id).or_default().push(clause);
        }

        standards
            .into_iter()
            .map(|row| {
                let standard = row.into_standard()?;
                let clauses = by_standard.remove(&standard.id).unwrap_or_default();
                Ok(StandardWithClauses { standard, clauses })
            })
            .collect()
    }

    async fn clause_refs(&self, ids: &[ClauseId]) -> Result<Vec<ClauseRef>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        sqlx::query_as::<_, ClauseRefRow>(
            "SELECT c.id AS clause_id, c.clause_number, c.title,
                    s.id AS standard_id, s.code, s.name
             FROM standard_clauses c
             JOIN standards s ON s.id = c.standard_id
             WHERE c.id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(ClauseRefRow::into_ref)
        .collect()
    }
}

#[async_trait]
impl DocumentEvidenceStore for PgStore {
    async fn verified_classifications(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<DocumentClassification>, StoreError> {
        sqlx::query_as::<_, ClassificationRow>(
            "SELECT dc.document_id, dc.standard_clause_id, dc.is_verified, dc.confidence
             FROM document_classifications dc
             JOIN documents d ON d.id = dc.document_id
             WHERE dc.is_verified
               AND d.organization_id = $1
               AND ($2::text IS NULL OR d.project_id = $2)
               AND d.status NOT IN ('ARCHIVED', 'EXPIRED')",
        )
        .bind(organization.as_str())
        .bind(project.map(ProjectId::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(ClassificationRow::into_classification)
        .collect()
    }
}

#[async_trait]
impl ChecklistEvidenceStore for PgStore {
    async fn clause_linked_items(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        sqlx::query_as::<_, ItemRow>(
            "SELECT ci.checklist_id, ci.standard_clause_id, ci.is_compliant,
                    ci.field_config, ci.response
             FROM checklist_items ci
             JOIN checklists c ON c.id = ci.checklist_id
             WHERE ci.standard_clause_id IS NOT NULL
               AND c.organization_id = $1
               AND ($2::text IS NULL OR c.project_id = $2)",
        )
        .bind(organization.as_str())
        .bind(project.map(ProjectId::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
        .map(|rows| rows.into_iter().map(ItemRow::into_item).collect())
    }
}

#[async_trait]
impl CrossReferenceStore for PgStore {
    async fn all_edges(&self) -> Result<Vec<CrossReference>, StoreError> {
        sqlx::query_as::<_, EdgeRow>(
            "SELECT source_clause_id, target_clause_id, mapping_type, notes
             FROM clause_cross_references ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(EdgeRow::into_edge)
        .collect()
    }

    async fn edges_touching(&self, clause: ClauseId) -> Result<Vec<CrossReference>, StoreError> {
        sqlx::query_as::<_, EdgeRow>(
            "SELECT source_clause_id, target_clause_id, mapping_type, notes
             FROM clause_cross_references
             WHERE source_clause_id = $1 OR target_clause_id = $1
             ORDER BY id",
        )
        .bind(clause.0)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(EdgeRow::into_edge)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_row(
        field_config: Option<serde_json::Value>,
        response: Option<serde_json::Value>,
    ) -> ItemRow {
        ItemRow {
            checklist_id: Uuid::new_v4(),
            standard_clause_id: Some(Uuid::new_v4()),
            is_compliant: Some(true),
            field_config,
            response,
        }
    }

    #[test]
    fn unknown_field_config_keeps_compliant_item() {
        let row = item_row(
            Some(json!({"kind": "TEXT", "maxLength": 200})),
            Some(json!("free text")),
        );
        let clause = row.standard_clause_id;
        let item = row.into_item();

        assert_eq!(item.is_compliant, Some(true));
        assert_eq!(item.standard_clause_id, clause.map(ClauseId));
        assert!(item.field_config.is_none());
        assert!(item.response.is_none());
    }

    #[test]
    fn known_field_config_decodes() {
        let item = item_row(Some(json!({"kind": "BOOLEAN"})), None).into_item();
        assert_eq!(item.field_config, Some(FieldConfig::Boolean));
    }
}
