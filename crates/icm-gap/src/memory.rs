//! # In-Memory Store
//!
//! Implements every store port over `parking_lot` locks. Backs the CLI when
//! no database is configured and every engine/browser test.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use icm_catalog::{ClauseRef, CrossReference, SeedCatalog, StandardWithClauses};
use icm_core::{
    ChecklistId, ClauseId, DocumentId, IcmError, IsoStandard, OrganizationId, ProjectId,
};

use crate::evidence::{
    Checklist, ChecklistItem, DocumentClassification, EvidenceDocument, EvidenceSet,
};
use crate::store::{
    ChecklistEvidenceStore, ClauseCatalogStore, CrossReferenceStore, DocumentEvidenceStore,
    StoreError,
};

/// Whether a tenant-owned record is in scope for `(organization, project)`.
fn in_scope(
    owner: &OrganizationId,
    owner_project: Option<&ProjectId>,
    organization: &OrganizationId,
    project: Option<&ProjectId>,
) -> bool {
    owner == organization && project.map_or(true, |p| owner_project == Some(p))
}

/// Store holding catalog, graph and evidence in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    standards: RwLock<Vec<StandardWithClauses>>,
    edges: RwLock<Vec<CrossReference>>,
    documents: RwLock<HashMap<DocumentId, EvidenceDocument>>,
    classifications: RwLock<Vec<DocumentClassification>>,
    checklists: RwLock<HashMap<ChecklistId, Checklist>>,
    items: RwLock<Vec<ChecklistItem>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with a catalog and its cross-reference graph.
    pub fn with_catalog(catalog: SeedCatalog) -> Self {
        let store = Self::new();
        for standard in catalog.standards {
            store.insert_standard(standard);
        }
        for edge in catalog.cross_references {
            store.insert_edge(edge);
        }
        store
    }

    /// Add or replace a standard. Clauses are kept sorted by number.
    pub fn insert_standard(&self, mut standard: StandardWithClauses) {
        standard
            .clauses
            .sort_by(|a, b| a.clause_number.cmp(&b.clause_number));
        let mut standards = self.standards.write();
        standards.retain(|s| s.standard.code != standard.standard.code);
        standards.push(standard);
        standards.sort_by(|a, b| a.standard.code.as_str().cmp(b.standard.code.as_str()));
    }

    /// Toggle a standard's active flag. Returns `false` if it is unknown.
    pub fn set_active(&self, code: IsoStandard, active: bool) -> bool {
        let mut standards = self.standards.write();
        match standards.iter_mut().find(|s| s.standard.code == code) {
            Some(s) => {
                s.standard.is_active = active;
                true
            }
            None => false,
        }
    }

    pub fn insert_edge(&self, edge: CrossReference) {
        self.edges.write().push(edge);
    }

    pub fn insert_document(&self, document: EvidenceDocument) {
        self.documents.write().insert(document.id, document);
    }

    pub fn insert_classification(&self, classification: DocumentClassification) {
        self.classifications.write().push(classification);
    }

    pub fn insert_checklist(&self, checklist: Checklist) {
        self.checklists.write().insert(checklist.id, checklist);
    }

    /// Add a checklist item after validating its field configuration.
    pub fn insert_item(&self, item: ChecklistItem) -> Result<(), IcmError> {
        item.validate()?;
        self.items.write().push(item);
        Ok(())
    }

    /// Load a whole evidence bundle. Nothing is inserted if any item is invalid.
    pub fn load_evidence(&self, evidence: EvidenceSet) -> Result<(), IcmError> {
        evidence.items.iter().try_for_each(ChecklistItem::validate)?;

        let EvidenceSet {
            documents,
            classifications,
            checklists,
            items,
        } = evidence;
        tracing::debug!(
            documents = documents.len(),
            classifications = classifications.len(),
            checklists = checklists.len(),
            items = items.len(),
            "loading evidence"
        );

        documents.into_iter().for_each(|d| self.insert_document(d));
        self.classifications.write().extend(classifications);
        checklists.into_iter().for_each(|c| self.insert_checklist(c));
        self.items.write().extend(items);
        Ok(())
    }
}

#[async_trait]
impl ClauseCatalogStore for MemoryStore {
    async fn active_standards_with_clauses(
        &self,
        code: Option<IsoStandard>,
    ) -> Result<Vec<StandardWithClauses>, StoreError> {
        Ok(self
            .standards
            .read()
            .iter()
            .filter(|s| s.standard.is_active)
            .filter(|s| code.map_or(true, |c| s.standard.code == c))
            .cloned()
            .collect())
    }

    async fn clause_refs(&self, ids: &[ClauseId]) -> Result<Vec<ClauseRef>, StoreError> {
        let standards = self.standards.read();
        Ok(ids
            .iter()
            .filter_map(|id| {
                standards.iter().find_map(|s| {
                    s.clauses
                        .iter()
                        .find(|c| c.id == *id)
                        .map(|c| ClauseRef::new(&s.standard, c))
                })
            })
            .collect())
    }
}

#[async_trait]
impl DocumentEvidenceStore for MemoryStore {
    async fn verified_classifications(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<DocumentClassification>, StoreError> {
        let documents = self.documents.read();
        Ok(self
            .classifications
            .read()
            .iter()
            .filter(|c| c.is_verified)
            .filter(|c| {
                documents.get(&c.document_id).is_some_and(|d| {
                    d.status.counts_as_evidence()
                        && in_scope(
                            &d.organization_id,
                            d.project_id.as_ref(),
                            organization,
                            project,
                        )
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChecklistEvidenceStore for MemoryStore {
    async fn clause_linked_items(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        let checklists = self.checklists.read();
        Ok(self
            .items
            .read()
            .iter()
            .filter(|i| i.standard_clause_id.is_some())
            .filter(|i| {
                checklists.get(&i.checklist_id).is_some_and(|c| {
                    in_scope(
                        &c.organization_id,
                        c.project_id.as_ref(),
                        organization,
                        project,
                    )
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CrossReferenceStore for MemoryStore {
    async fn all_edges(&self) -> Result<Vec<CrossReference>, StoreError> {
        Ok(self.edges.read().clone())
    }

    async fn edges_touching(&self, clause: ClauseId) -> Result<Vec<CrossReference>, StoreError> {
        Ok(self
            .edges
            .read()
            .iter()
            .filter(|e| e.touches(clause))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_catalog::seed_standard;
    use icm_core::{ClauseNumber, Confidence, DocumentStatus, FieldConfig, FieldResponse};

    fn org(id: &str) -> OrganizationId {
        OrganizationId::new(id).unwrap()
    }

    fn clause_4_1() -> ClauseId {
        ClauseId::for_clause(IsoStandard::Iso9001, &ClauseNumber::new("4.1").unwrap())
    }

    fn document(owner: &str, project: Option<&str>, status: DocumentStatus) -> EvidenceDocument {
        EvidenceDocument {
            id: DocumentId::new(),
            organization_id: org(owner),
            project_id: project.map(|p| ProjectId::new(p).unwrap()),
            status,
        }
    }

    fn classify(store: &MemoryStore, doc: &EvidenceDocument, verified: bool) {
        store.insert_document(doc.clone());
        store.insert_classification(DocumentClassification {
            document_id: doc.id,
            standard_clause_id: clause_4_1(),
            is_verified: verified,
            confidence: Confidence::new(0.95).unwrap(),
        });
    }

    #[tokio::test]
    async fn standards_come_back_sorted_by_code_and_filtered() {
        let store = MemoryStore::new();
        store.insert_standard(seed_standard(IsoStandard::Iso9001).unwrap());
        store.insert_standard(seed_standard(IsoStandard::Iso14001).unwrap());
        store.insert_standard(seed_standard(IsoStandard::Iso27001).unwrap());
        assert!(store.set_active(IsoStandard::Iso27001, false));
        assert!(!store.set_active(IsoStandard::Iso39001, false));

        let all = store.active_standards_with_clauses(None).await.unwrap();
        let codes: Vec<_> = all.iter().map(|s| s.standard.code.as_str()).collect();
        assert_eq!(codes, vec!["ISO14001", "ISO9001"]);

        let one = store
            .active_standards_with_clauses(Some(IsoStandard::Iso9001))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        let numbers: Vec<_> = one[0].clauses.iter().map(|c| c.clause_number.as_str()).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(numbers, sorted);
    }

    #[tokio::test]
    async fn classifications_are_scoped_and_filtered() {
        let store = MemoryStore::new();
        let mine = document("org-a", Some("p1"), DocumentStatus::Active);
        let archived = document("org-a", None, DocumentStatus::Archived);
        let expired = document("org-a", None, DocumentStatus::Expired);
        let theirs = document("org-b", None, DocumentStatus::Active);
        let unverified = document("org-a", None, DocumentStatus::Draft);
        classify(&store, &mine, true);
        classify(&store, &archived, true);
        classify(&store, &expired, true);
        classify(&store, &theirs, true);
        classify(&store, &unverified, false);

        let a = store
            .verified_classifications(&org("org-a"), None)
            .await
            .unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].document_id, mine.id);

        let p2 = ProjectId::new("p2").unwrap();
        assert!(store
            .verified_classifications(&org("org-a"), Some(&p2))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unlinked_items_are_not_returned() {
        let store = MemoryStore::new();
        let checklist = Checklist {
            id: ChecklistId::new(),
            organization_id: org("org-a"),
            project_id: None,
        };
        store.insert_checklist(checklist.clone());
        for clause in [Some(clause_4_1()), None] {
            store
                .insert_item(ChecklistItem {
                    checklist_id: checklist.id,
                    standard_clause_id: clause,
                    is_compliant: Some(true),
                    field_config: None,
                    response: None,
                })
                .unwrap();
        }
        let items = store.clause_linked_items(&org("org-a"), None).await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(store
            .clause_linked_items(&org("org-b"), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_bundle_is_rejected_whole() {
        let store = MemoryStore::new();
        let checklist = Checklist {
            id: ChecklistId::new(),
            organization_id: org("org-a"),
            project_id: None,
        };
        let bad = ChecklistItem {
            checklist_id: checklist.id,
            standard_clause_id: Some(clause_4_1()),
            is_compliant: Some(true),
            field_config: Some(FieldConfig::Rating { max: 5 }),
            response: Some(FieldResponse::Rating(9)),
        };
        let result = store.load_evidence(EvidenceSet {
            checklists: vec![checklist],
            items: vec![bad],
            ..EvidenceSet::default()
        });
        assert!(result.is_err());
        assert!(store.checklists.read().is_empty());
    }

    #[tokio::test]
    async fn edges_match_either_endpoint() {
        let (a, b) = (ClauseId::new(), ClauseId::new());
        let store = MemoryStore::new();
        store.insert_edge(CrossReference {
            source_clause_id: a,
            target_clause_id: b,
            mapping_type: icm_core::MappingType::Related,
            notes: None,
        });
        assert_eq!(store.edges_touching(a).await.unwrap().len(), 1);
        assert_eq!(store.edges_touching(b).await.unwrap().len(), 1);
        assert!(store.edges_touching(ClauseId::new()).await.unwrap().is_empty());
    }
}
