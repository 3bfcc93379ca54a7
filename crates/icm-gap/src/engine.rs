//! # Gap Analysis Engine
//!
//! Four independent reads run concurrently, then a pure aggregation scores
//! every leaf clause and rolls statuses up:
//!
//! ```text
//! catalog ─┐
//! docs ────┼─▶ EvidenceIndex ─▶ analyze() ─▶ GapAnalysisSummary
//! items ───┤
//! edges ───┘
//! ```
//!
//! Store failures propagate unchanged. Absent evidence yields zero counts,
//! never an error.

use std::sync::Arc;

use icm_catalog::{Clause, ClauseTree, StandardWithClauses};
use icm_core::{ClauseOrdering, IsoStandard, OrganizationId, ProjectId};

use crate::analysis::{
    coverage_percent, ClauseGapData, GapAnalysisSummary, StandardGapAnalysis, TopLevelClauseGap,
};
use crate::evidence::EvidenceIndex;
use crate::insights::{integration_opportunities, IntegrationOpportunity};
use crate::status::CoverageStatus;
use crate::store::{
    ChecklistEvidenceStore, ClauseCatalogStore, CrossReferenceStore, DocumentEvidenceStore,
    StoreError,
};

/// Inputs to one gap analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct GapAnalysisQuery {
    /// Tenant whose evidence is scored. Trusted as given.
    pub organization_id: OrganizationId,
    /// Restrict to one standard.
    pub standard: Option<IsoStandard>,
    /// Restrict evidence to one project.
    pub project_id: Option<ProjectId>,
}

impl GapAnalysisQuery {
    /// Query across all standards and projects.
    pub fn for_organization(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            standard: None,
            project_id: None,
        }
    }

    pub fn with_standard(mut self, standard: Option<IsoStandard>) -> Self {
        self.standard = standard;
        self
    }

    pub fn with_project(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }
}

/// Computes [`GapAnalysisSummary`] values from the store ports.
#[derive(Clone)]
pub struct GapAnalysisEngine {
    catalog: Arc<dyn ClauseCatalogStore>,
    documents: Arc<dyn DocumentEvidenceStore>,
    checklists: Arc<dyn ChecklistEvidenceStore>,
    cross_refs: Arc<dyn CrossReferenceStore>,
    ordering: ClauseOrdering,
}

impl std::fmt::Debug for GapAnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GapAnalysisEngine")
            .field("ordering", &self.ordering)
            .finish_non_exhaustive()
    }
}

impl GapAnalysisEngine {
    pub fn new(
        catalog: Arc<dyn ClauseCatalogStore>,
        documents: Arc<dyn DocumentEvidenceStore>,
        checklists: Arc<dyn ChecklistEvidenceStore>,
        cross_refs: Arc<dyn CrossReferenceStore>,
    ) -> Self {
        Self {
            catalog,
            documents,
            checklists,
            cross_refs,
            ordering: ClauseOrdering::default(),
        }
    }

    /// Engine over a single store implementing every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ClauseCatalogStore
            + DocumentEvidenceStore
            + ChecklistEvidenceStore
            + CrossReferenceStore
            + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Order clauses within each standard by `ordering`.
    pub fn with_ordering(mut self, ordering: ClauseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> ClauseOrdering {
        self.ordering
    }

    /// Run a gap analysis.
    #[tracing::instrument(
        skip(self, query),
        fields(
            org = %query.organization_id,
            standard = ?query.standard,
            project = ?query.project_id,
        )
    )]
    pub async fn compute(&self, query: &GapAnalysisQuery) -> Result<GapAnalysisSummary, StoreError> {
        let project = query.project_id.as_ref();
        let (standards, classifications, items, edges) = tokio::try_join!(
            self.catalog.active_standards_with_clauses(query.standard),
            self.documents
                .verified_classifications(&query.organization_id, project),
            self.checklists
                .clause_linked_items(&query.organization_id, project),
            self.cross_refs.all_edges(),
        )?;

        tracing::debug!(
            standards = standards.len(),
            classifications = classifications.len(),
            items = items.len(),
            edges = edges.len(),
            "gap analysis inputs loaded"
        );

        let index = EvidenceIndex::build(&classifications, &items, &edges);
        let summary = analyze(&standards, &index, self.ordering);

        tracing::info!(
            total = summary.total_sub_clauses,
            covered = summary.covered,
            partial = summary.partial,
            gaps = summary.gaps,
            percent = summary.overall_coverage_percent,
            "gap analysis computed"
        );
        Ok(summary)
    }

    /// Run a gap analysis and list its integration opportunities.
    pub async fn opportunities(
        &self,
        query: &GapAnalysisQuery,
    ) -> Result<Vec<IntegrationOpportunity>, StoreError> {
        let summary = self.compute(query).await?;
        Ok(integration_opportunities(&summary))
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Score every standard against the evidence index.
pub fn analyze(
    standards: &[StandardWithClauses],
    index: &EvidenceIndex,
    ordering: ClauseOrdering,
) -> GapAnalysisSummary {
    let standards: Vec<StandardGapAnalysis> = standards
        .iter()
        .map(|s| analyze_standard(s, index, ordering))
        .collect();

    let total: u32 = standards.iter().map(|s| s.total_sub_clauses).sum();
    let covered: u32 = standards.iter().map(|s| s.covered).sum();

    GapAnalysisSummary {
        total_sub_clauses: total,
        covered,
        partial: standards.iter().map(|s| s.partial).sum(),
        gaps: standards.iter().map(|s| s.gaps).sum(),
        overall_coverage_percent: coverage_percent(covered, total),
        standards,
    }
}

fn clause_gap(clause: &Clause, index: &EvidenceIndex) -> ClauseGapData {
    let doc_count = index.doc_count(clause.id);
    let tally = index.checklist(clause.id);
    ClauseGapData {
        clause_id: clause.id,
        clause_number: clause.clause_number.clone(),
        title: clause.title.clone(),
        description: clause.description.clone(),
        status: CoverageStatus::from_evidence(doc_count, tally.compliant),
        doc_count,
        checklist_compliant_count: tally.compliant,
        checklist_total_count: tally.total,
        cross_ref_count: index.cross_ref_count(clause.id),
    }
}

fn analyze_standard(
    standard: &StandardWithClauses,
    index: &EvidenceIndex,
    ordering: ClauseOrdering,
) -> StandardGapAnalysis {
    let tree = ClauseTree::build(&standard.clauses, ordering);

    let (mut covered, mut partial, mut gaps) = (0u32, 0u32, 0u32);
    for leaf in tree.leaves() {
        match clause_gap(leaf, index).status {
            CoverageStatus::Covered => covered += 1,
            CoverageStatus::Partial => partial += 1,
            CoverageStatus::Gap => gaps += 1,
        }
    }
    let total = covered + partial + gaps;

    let clauses = tree
        .top_level()
        .filter_map(|top| {
            let children: Vec<ClauseGapData> = tree
                .children(top.id)
                .map(|c| clause_gap(c, index))
                .collect();
            let status = CoverageStatus::roll_up(children.iter().map(|c| c.status))?;
            Some(TopLevelClauseGap {
                clause_id: top.id,
                clause_number: top.clause_number.clone(),
                title: top.title.clone(),
                description: top.description.clone(),
                status,
                children,
            })
        })
        .collect();

    StandardGapAnalysis {
        standard_id: standard.standard.id,
        code: standard.standard.code,
        name: standard.standard.name.clone(),
        coverage_percent: coverage_percent(covered, total),
        total_sub_clauses: total,
        covered,
        partial,
        gaps,
        clauses,
    }
}
