//! # Evidence Fixtures
//!
//! Loads tenant evidence from a JSON (`.json`) or YAML (`.yaml`, `.yml`)
//! file. Clause links may be written as a clause UUID or as a
//! `CODE:number` reference such as `ISO9001:4.1`, which resolves to the
//! seed catalog's deterministic clause id.
//!
//! ```yaml
//! documents:
//!   - id: 6f1c0d52-3a55-4c53-9b53-1d7e3f0b8a11
//!     organizationId: acme
//!     status: ACTIVE
//! classifications:
//!   - documentId: 6f1c0d52-3a55-4c53-9b53-1d7e3f0b8a11
//!     standardClauseId: ISO9001:4.1
//!     confidence: 0.92
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use icm_core::{
    ChecklistId, ClauseId, ClauseNumber, Confidence, DocumentId, FieldConfig, FieldResponse,
    IsoStandard,
};
use icm_gap::{Checklist, ChecklistItem, DocumentClassification, EvidenceDocument, EvidenceSet};

/// A clause given either by id or by `CODE:number`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClauseSpec {
    Id(ClauseId),
    Reference(String),
}

impl ClauseSpec {
    pub fn resolve(&self) -> Result<ClauseId> {
        match self {
            Self::Id(id) => Ok(*id),
            Self::Reference(raw) => parse_clause_reference(raw),
        }
    }
}

/// Resolve `ISO9001:4.1` to its seed clause id.
pub fn parse_clause_reference(raw: &str) -> Result<ClauseId> {
    let Some((code, number)) = raw.split_once(':') else {
        bail!("clause reference {raw:?} is neither a UUID nor CODE:number");
    };
    let code: IsoStandard = code.trim().parse()?;
    let number = ClauseNumber::new(number.trim())?;
    Ok(ClauseId::for_clause(code, &number))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureClassification {
    document_id: DocumentId,
    standard_clause_id: ClauseSpec,
    #[serde(default = "verified")]
    is_verified: bool,
    confidence: Confidence,
}

fn verified() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureItem {
    checklist_id: ChecklistId,
    #[serde(default)]
    standard_clause_id: Option<ClauseSpec>,
    #[serde(default)]
    is_compliant: Option<bool>,
    #[serde(default)]
    field_config: Option<FieldConfig>,
    #[serde(default)]
    response: Option<FieldResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FixtureFile {
    documents: Vec<EvidenceDocument>,
    classifications: Vec<FixtureClassification>,
    checklists: Vec<Checklist>,
    items: Vec<FixtureItem>,
}

impl FixtureFile {
    fn into_evidence(self) -> Result<EvidenceSet> {
        let classifications = self
            .classifications
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                Ok(DocumentClassification {
                    document_id: c.document_id,
                    standard_clause_id: c
                        .standard_clause_id
                        .resolve()
                        .with_context(|| format!("classifications[{i}]"))?,
                    is_verified: c.is_verified,
                    confidence: c.confidence,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Ok(ChecklistItem {
                    checklist_id: item.checklist_id,
                    standard_clause_id: item
                        .standard_clause_id
                        .map(|spec| spec.resolve())
                        .transpose()
                        .with_context(|| format!("items[{i}]"))?,
                    is_compliant: item.is_compliant,
                    field_config: item.field_config,
                    response: item.response,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EvidenceSet {
            documents: self.documents,
            classifications,
            checklists: self.checklists,
            items,
        })
    }
}

/// Read and parse an evidence fixture, choosing the format by extension.
pub fn load_evidence(path: &Path) -> Result<EvidenceSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read evidence file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file: FixtureFile = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?,
        _ => bail!(
            "unsupported evidence file {}: expected .json, .yaml or .yml",
            path.display()
        ),
    };

    let evidence = file
        .into_evidence()
        .with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(
        documents = evidence.documents.len(),
        classifications = evidence.classifications.len(),
        checklists = evidence.checklists.len(),
        items = evidence.items.len(),
        "evidence fixture loaded"
    );
    Ok(evidence)
}
