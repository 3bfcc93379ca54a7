//! # Cross-Reference Browser
//!
//! Read models over the global cross-reference graph:
//!
//! - **Matrix**: top-level clauses of every active standard and the edges
//!   that touch them, with per-cell mapping-type lookups.
//! - **Overlap**: an N×N symmetric count of edges between each pair of
//!   active standards, plus the edges behind each count.
//! - **Drill-down**: every edge touching one clause, normalized to the
//!   clause at the other end.
//!
//! A browser is built per request. It memoizes the catalog snapshot and
//! each drill-down for its own lifetime only.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use icm_catalog::{Clause, ClauseRef, CrossReference, Standard, StandardWithClauses, HLS_TOP_LEVEL};
use icm_core::{ClauseId, ClauseNumber, IsoStandard, MappingType};

use crate::memo::RequestMemo;
use crate::store::{ClauseCatalogStore, CrossReferenceStore, StoreError};

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// Top-level clauses of every active standard against the edges touching them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrossReferenceMatrix {
    #[schema(value_type = Vec<Object>)]
    pub standards: Vec<Standard>,
    #[schema(value_type = Vec<Object>)]
    pub clauses: Vec<Clause>,
    #[schema(value_type = Vec<Object>)]
    pub cross_refs: Vec<CrossReference>,
}

impl CrossReferenceMatrix {
    /// Row labels: the HLS top-level clause numbers.
    pub fn rows() -> Vec<&'static str> {
        HLS_TOP_LEVEL.iter().map(|(n, _, _)| *n).collect()
    }

    /// Distinct mapping types on edges touching `code`'s top-level clause
    /// numbered `clause_number`. Empty when the standard has no such clause.
    pub fn cell(&self, clause_number: &ClauseNumber, code: IsoStandard) -> Vec<MappingType> {
        let Some(standard) = self.standards.iter().find(|s| s.code == code) else {
            return Vec::new();
        };
        let Some(clause) = self
            .clauses
            .iter()
            .find(|c| c.standard_id == standard.id && &c.clause_number == clause_number)
        else {
            return Vec::new();
        };
        self.cross_refs
            .iter()
            .filter(|e| e.touches(clause.id))
            .map(|e| e.mapping_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// One edge behind an overlap count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlapReference {
    #[schema(value_type = Object)]
    pub source: ClauseRef,
    #[schema(value_type = Object)]
    pub target: ClauseRef,
    #[schema(value_type = String, example = "EQUIVALENT")]
    pub mapping_type: MappingType,
    pub notes: Option<String>,
}

/// Pairwise edge counts between active standards.
///
/// `matrix[i][j]` indexes `standards`. The diagonal holds each standard's
/// top-level clause count. `details` is keyed by the two codes sorted and
/// joined with `|`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandardOverlap {
    #[schema(value_type = Vec<Object>)]
    pub standards: Vec<Standard>,
    pub matrix: Vec<Vec<u32>>,
    pub details: BTreeMap<String, Vec<OverlapReference>>,
}

impl StandardOverlap {
    /// Count for a pair of codes, if both are present.
    pub fn count(&self, a: IsoStandard, b: IsoStandard) -> Option<u32> {
        let i = self.standards.iter().position(|s| s.code == a)?;
        let j = self.standards.iter().position(|s| s.code == b)?;
        Some(self.matrix[i][j])
    }
}

/// `details` key for a pair of standards.
pub fn pair_key(a: IsoStandard, b: IsoStandard) -> String {
    let (lo, hi) = if a.as_str() <= b.as_str() { (a, b) } else { (b, a) };
    format!("{}|{}", lo.as_str(), hi.as_str())
}

/// An edge seen from one clause, normalized to the clause at the other end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrossRefItem {
    #[schema(value_type = String)]
    pub clause_id: ClauseId,
    #[schema(value_type = String, example = "4.1")]
    pub clause_number: ClauseNumber,
    pub title: String,
    #[schema(value_type = String, example = "ISO14001")]
    pub standard_code: IsoStandard,
    pub standard_name: String,
    #[schema(value_type = String, example = "EQUIVALENT")]
    pub mapping_type: MappingType,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Snapshot {
    standards: Vec<StandardWithClauses>,
    edges: Vec<CrossReference>,
}

/// Request-scoped browser over the catalog and the cross-reference graph.
pub struct CrossReferenceBrowser {
    catalog: Arc<dyn ClauseCatalogStore>,
    cross_refs: Arc<dyn CrossReferenceStore>,
    snapshot: RequestMemo<(), Arc<Snapshot>>,
    references: RequestMemo<ClauseId, Arc<Vec<CrossRefItem>>>,
}

impl CrossReferenceBrowser {
    pub fn new(
        catalog: Arc<dyn ClauseCatalogStore>,
        cross_refs: Arc<dyn CrossReferenceStore>,
    ) -> Self {
        Self {
            catalog,
            cross_refs,
            snapshot: RequestMemo::new(),
            references: RequestMemo::new(),
        }
    }

    /// Browser over a single store implementing both ports.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ClauseCatalogStore + CrossReferenceStore + 'static,
    {
        Self::new(store.clone(), store)
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError> {
        self.snapshot
            .get_or_try_insert_with((), || async move {
                let (standards, edges) = tokio::try_join!(
                    self.catalog.active_standards_with_clauses(None),
                    self.cross_refs.all_edges(),
                )?;
                Ok::<_, StoreError>(Arc::new(Snapshot { standards, edges }))
            })
            .await
    }

    /// Top-level clauses of active standards and the edges touching them.
    pub async fn matrix(&self) -> Result<CrossReferenceMatrix, StoreError> {
        let snapshot = self.snapshot().await?;

        let clauses: Vec<Clause> = snapshot
            .standards
            .iter()
            .flat_map(|s| s.top_level().cloned())
            .collect();
        let top_level_ids: BTreeSet<ClauseId> = clauses.iter().map(|c| c.id).collect();
        let cross_refs = snapshot
            .edges
            .iter()
            .filter(|e| {
                top_level_ids.contains(&e.source_clause_id)
                    || top_level_ids.contains(&e.target_clause_id)
            })
            .cloned()
            .collect();

        Ok(CrossReferenceMatrix {
            standards: snapshot.standards.iter().map(|s| s.standard.clone()).collect(),
            clauses,
            cross_refs,
        })
    }

    /// Pairwise overlap counts between active standards.
    pub async fn overlap(&self) -> Result<StandardOverlap, StoreError> {
        let snapshot = self.snapshot().await?;
        let standards = &snapshot.standards;
        let n = standards.len();

        // clause id -> (standard position, resolved clause)
        let mut owner: HashMap<ClauseId, (usize, ClauseRef)> = HashMap::new();
        for (pos, s) in standards.iter().enumerate() {
            for clause in &s.clauses {
                owner.insert(clause.id, (pos, ClauseRef::new(&s.standard, clause)));
            }
        }

        let mut matrix = vec![vec![0u32; n]; n];
        for (pos, s) in standards.iter().enumerate() {
            matrix[pos][pos] = s.top_level().count() as u32;
        }

        let mut details: BTreeMap<String, Vec<OverlapReference>> = BTreeMap::new();
        for edge in &snapshot.edges {
            let (Some((i, source)), Some((j, target))) = (
                owner.get(&edge.source_clause_id),
                owner.get(&edge.target_clause_id),
            ) else {
                continue;
            };
            if i == j {
                continue;
            }
            matrix[*i][*j] += 1;
            matrix[*j][*i] += 1;
            details
                .entry(pair_key(source.standard_code, target.standard_code))
                .or_default()
                .push(OverlapReference {
                    source: source.clone(),
                    target: target.clone(),
                    mapping_type: edge.mapping_type,
                    notes: edge.notes.clone(),
                });
        }

        Ok(StandardOverlap {
            standards: standards.iter().map(|s| s.standard.clone()).collect(),
            matrix,
            details,
        })
    }

    /// Every edge touching `clause`, normalized to the other endpoint.
    ///
    /// Sorted EQUIVALENT, RELATED, SUPPORTING, then by the other standard's
    /// code and clause number.
    pub async fn clause_references(
        &self,
        clause: ClauseId,
    ) -> Result<Arc<Vec<CrossRefItem>>, StoreError> {
        self.references
            .get_or_try_insert_with(clause, || self.load_clause_references(clause))
            .await
    }

    async fn load_clause_references(
        &self,
        clause: ClauseId,
    ) -> Result<Arc<Vec<CrossRefItem>>, StoreError> {
        let edges = self.cross_refs.edges_touching(clause).await?;
        let others: Vec<ClauseId> = edges.iter().filter_map(|e| e.other_end(clause)).collect();
        let resolved: HashMap<ClauseId, ClauseRef> = self
            .catalog
            .clause_refs(&others)
            .await?
            .into_iter()
            .map(|r| (r.clause_id, r))
            .collect();

        let mut items: Vec<CrossRefItem> = edges
            .iter()
            .filter_map(|edge| {
                let other = edge.other_end(clause)?;
                let Some(r) = resolved.get(&other) else {
                    tracing::warn!(%clause, %other, "cross-reference endpoint missing from catalog");
                    return None;
                };
                Some(CrossRefItem {
                    clause_id: r.clause_id,
                    clause_number: r.clause_number.clone(),
                    title: r.title.clone(),
                    standard_code: r.standard_code,
                    standard_name: r.standard_name.clone(),
                    mapping_type: edge.mapping_type,
                    notes: edge.notes.clone(),
                })
            })
            .collect();

        items.sort_by(|a, b| {
            a.mapping_type
                .cmp(&b.mapping_type)
                .then_with(|| a.standard_code.as_str().cmp(b.standard_code.as_str()))
                .then_with(|| a.clause_number.cmp(&b.clause_number))
        });
        Ok(Arc::new(items))
    }
}
