//! # Store Ports
//!
//! The four reads the engine and browser depend on. Implementations live
//! outside this module: [`crate::memory::MemoryStore`] for tests and the CLI,
//! and the Postgres adapter in `icm-api`.
//!
//! Evidence reads are organization-scoped (and project-scoped when a project
//! is given). Catalog and cross-reference reads are global.

use async_trait::async_trait;
use thiserror::Error;

use icm_catalog::{ClauseRef, CrossReference, StandardWithClauses};
use icm_core::{ClauseId, IsoStandard, OrganizationId, ProjectId};

use crate::evidence::{ChecklistItem, DocumentClassification};

/// Failure reading from a backing store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend returned an error.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The backend could not be reached.
    #[error("store unavailable")]
    Unavailable,
}

/// Read access to the global clause catalog.
#[async_trait]
pub trait ClauseCatalogStore: Send + Sync {
    /// Active standards, optionally restricted to one code, each with its
    /// full clause list ordered by clause number.
    async fn active_standards_with_clauses(
        &self,
        code: Option<IsoStandard>,
    ) -> Result<Vec<StandardWithClauses>, StoreError>;

    /// Resolve clauses by id together with their standard's identity.
    ///
    /// Unknown ids are skipped.
    async fn clause_refs(&self, ids: &[ClauseId]) -> Result<Vec<ClauseRef>, StoreError>;
}

/// Verified document classifications for one tenant.
#[async_trait]
pub trait DocumentEvidenceStore: Send + Sync {
    /// Verified classifications on documents owned by `organization`
    /// (and `project`, when given) whose status still counts as evidence.
    async fn verified_classifications(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<DocumentClassification>, StoreError>;
}

/// Checklist outcomes for one tenant.
#[async_trait]
pub trait ChecklistEvidenceStore: Send + Sync {
    /// Items with a clause link on checklists owned by `organization`
    /// (and `project`, when given).
    async fn clause_linked_items(
        &self,
        organization: &OrganizationId,
        project: Option<&ProjectId>,
    ) -> Result<Vec<ChecklistItem>, StoreError>;
}

/// Read access to the global cross-reference graph.
#[async_trait]
pub trait CrossReferenceStore: Send + Sync {
    /// Every edge.
    async fn all_edges(&self) -> Result<Vec<CrossReference>, StoreError>;

    /// Edges with `clause` as source or target.
    async fn edges_touching(&self, clause: ClauseId) -> Result<Vec<CrossReference>, StoreError>;
}
