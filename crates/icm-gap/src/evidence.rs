//! # Evidence
//!
//! Tenant-owned records that feed coverage: documents with their clause
//! classifications, and checklists with their items. [`EvidenceIndex`] folds
//! the store reads into per-clause lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use icm_catalog::CrossReference;
use icm_core::{
    ChecklistId, ClauseId, Confidence, DocumentId, DocumentStatus, FieldConfig, FieldResponse,
    IcmError, OrganizationId, ProjectId,
};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// An uploaded evidence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDocument {
    pub id: DocumentId,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    pub status: DocumentStatus,
}

/// A document tagged against one clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentClassification {
    pub document_id: DocumentId,
    pub standard_clause_id: ClauseId,
    pub is_verified: bool,
    pub confidence: Confidence,
}

/// A checklist run owned by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: ChecklistId,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// One question on a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub checklist_id: ChecklistId,
    #[serde(default)]
    pub standard_clause_id: Option<ClauseId>,
    /// `None` until answered.
    #[serde(default)]
    pub is_compliant: Option<bool>,
    #[serde(default)]
    pub field_config: Option<FieldConfig>,
    #[serde(default)]
    pub response: Option<FieldResponse>,
}

impl ChecklistItem {
    /// Check the field configuration and, when both are present, the
    /// response against it.
    pub fn validate(&self) -> Result<(), IcmError> {
        match (&self.field_config, &self.response) {
            (Some(config), Some(response)) => {
                config.validate()?;
                config.validate_response(response)
            }
            (Some(config), None) => config.validate(),
            (None, Some(_)) => Err(IcmError::InvalidResponse(
                "response given for an item without a field configuration".to_string(),
            )),
            (None, None) => Ok(()),
        }
    }
}

/// A bundle of tenant evidence, as loaded from a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceSet {
    pub documents: Vec<EvidenceDocument>,
    pub classifications: Vec<DocumentClassification>,
    pub checklists: Vec<Checklist>,
    pub items: Vec<ChecklistItem>,
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Checklist outcome counts for one clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecklistTally {
    /// Items answered compliant.
    pub compliant: u32,
    /// All clause-linked items, answered or not.
    pub total: u32,
}

/// Per-clause evidence counts built from one round of store reads.
#[derive(Debug, Clone, Default)]
pub struct EvidenceIndex {
    docs: HashMap<ClauseId, u32>,
    checklists: HashMap<ClauseId, ChecklistTally>,
    cross_refs: HashMap<ClauseId, u32>,
}

impl EvidenceIndex {
    /// Fold classifications, checklist items and edges into lookups.
    ///
    /// Unverified classifications and unlinked items are ignored. Each edge
    /// counts once for each endpoint.
    pub fn build(
        classifications: &[DocumentClassification],
        items: &[ChecklistItem],
        edges: &[CrossReference],
    ) -> Self {
        let mut docs: HashMap<ClauseId, u32> = HashMap::new();
        for c in classifications.iter().filter(|c| c.is_verified) {
            *docs.entry(c.standard_clause_id).or_default() += 1;
        }

        let mut checklists: HashMap<ClauseId, ChecklistTally> = HashMap::new();
        for item in items {
            let Some(clause) = item.standard_clause_id else {
                continue;
            };
            let tally = checklists.entry(clause).or_default();
            tally.total += 1;
            if item.is_compliant == Some(true) {
                tally.compliant += 1;
            }
        }

        let mut cross_refs: HashMap<ClauseId, u32> = HashMap::new();
        for edge in edges {
            *cross_refs.entry(edge.source_clause_id).or_default() += 1;
            *cross_refs.entry(edge.target_clause_id).or_default() += 1;
        }

        Self {
            docs,
            checklists,
            cross_refs,
        }
    }

    /// Verified documents classified against `clause`.
    pub fn doc_count(&self, clause: ClauseId) -> u32 {
        self.docs.get(&clause).copied().unwrap_or(0)
    }

    /// Checklist outcomes for `clause`.
    pub fn checklist(&self, clause: ClauseId) -> ChecklistTally {
        self.checklists.get(&clause).copied().unwrap_or_default()
    }

    /// Edge endpoints at `clause`.
    pub fn cross_ref_count(&self, clause: ClauseId) -> u32 {
        self.cross_refs.get(&clause).copied().unwrap_or(0)
    }
}
