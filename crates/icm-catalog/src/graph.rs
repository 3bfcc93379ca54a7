//! # Cross-Reference Graph
//!
//! Edges between clauses, possibly across standards. Stored directed with at
//! most one edge per ordered (source, target) pair; consumers treat them as
//! undirected.
//!
//! Two sources feed the graph:
//!
//! - [`generate_equivalences`]: one EQUIVALENT edge per pair of standards
//!   per HLS clause number present in both.
//! - [`curated_references`]: a fixed table of RELATED/SUPPORTING edges
//!   between clauses outside the shared HLS numbering.

use std::collections::{HashMap, HashSet};

use icm_core::{ClauseId, ClauseNumber, IsoStandard, MappingType};

use crate::error::CatalogError;
use crate::model::{CrossReference, StandardWithClauses};
use crate::seed::is_hls_number;

/// Curated edges: (source standard, source clause, target standard, target clause, type, notes).
const CURATED: &[(IsoStandard, &str, IsoStandard, &str, MappingType, &str)] = &[
    (
        IsoStandard::Iso27001,
        "8.2",
        IsoStandard::Iso22301,
        "8.2",
        MappingType::Related,
        "Both require a repeatable risk assessment process",
    ),
    (
        IsoStandard::Iso27001,
        "8.3",
        IsoStandard::Iso22301,
        "8.3",
        MappingType::Related,
        "Risk treatment decisions inform continuity strategy selection",
    ),
    (
        IsoStandard::Iso45001,
        "8.2",
        IsoStandard::Iso14001,
        "8.2",
        MappingType::Related,
        "Shared emergency preparedness and response arrangements",
    ),
    (
        IsoStandard::Iso39001,
        "8.2",
        IsoStandard::Iso45001,
        "8.2",
        MappingType::Related,
        "Road incident response is part of workplace emergency planning",
    ),
    (
        IsoStandard::Iso9001,
        "6.3",
        IsoStandard::Iso27001,
        "6.3",
        MappingType::Related,
        "Planning of changes",
    ),
    (
        IsoStandard::Iso9001,
        "8.4",
        IsoStandard::Iso37001,
        "8.2",
        MappingType::Supporting,
        "Supplier controls support due diligence on business associates",
    ),
    (
        IsoStandard::Iso37001,
        "8.3",
        IsoStandard::Iso9001,
        "9.1",
        MappingType::Supporting,
        "Financial control monitoring feeds performance evaluation",
    ),
    (
        IsoStandard::Iso45001,
        "5.4",
        IsoStandard::Iso14001,
        "7.4",
        MappingType::Supporting,
        "Worker consultation relies on internal communication processes",
    ),
    (
        IsoStandard::Iso22301,
        "8.5",
        IsoStandard::Iso45001,
        "8.2",
        MappingType::Supporting,
        "Continuity exercises test emergency response",
    ),
    (
        IsoStandard::Iso9001,
        "8.7",
        IsoStandard::Iso9001,
        "10.2",
        MappingType::Supporting,
        "Nonconforming outputs feed corrective action",
    ),
];

/// A deduplicated set of cross-reference edges.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceGraph {
    edges: Vec<CrossReference>,
    keys: HashSet<(ClauseId, ClauseId)>,
}

impl CrossReferenceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge, rejecting self-references and duplicate ordered pairs.
    pub fn insert(&mut self, edge: CrossReference) -> Result<(), CatalogError> {
        if edge.source_clause_id == edge.target_clause_id {
            return Err(CatalogError::SelfReference(edge.source_clause_id));
        }
        if !self.keys.insert((edge.source_clause_id, edge.target_clause_id)) {
            return Err(CatalogError::DuplicateEdge {
                source_clause: edge.source_clause_id,
                target_clause: edge.target_clause_id,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Insert every edge, stopping at the first rejection.
    pub fn extend(
        &mut self,
        edges: impl IntoIterator<Item = CrossReference>,
    ) -> Result<(), CatalogError> {
        edges.into_iter().try_for_each(|edge| self.insert(edge))
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Consume the graph, returning its edges.
    pub fn into_edges(self) -> Vec<CrossReference> {
        self.edges
    }
}

/// One EQUIVALENT edge per unordered pair of standards per shared HLS number.
///
/// HLS numbers include the top-level clauses 4 to 10 as well as the shared
/// sub-clauses, so top-level rows of the matrix and overlap carry edges too.
/// The earlier standard in `standards` order is the source.
pub fn generate_equivalences(standards: &[StandardWithClauses]) -> Vec<CrossReference> {
    let mut edges = Vec::new();
    for (i, a) in standards.iter().enumerate() {
        for b in &standards[i + 1..] {
            for clause in a.clauses.iter().filter(|c| is_hls_number(&c.clause_number)) {
                if let Some(other) = b.clause(&clause.clause_number) {
                    edges.push(CrossReference {
                        source_clause_id: clause.id,
                        target_clause_id: other.id,
                        mapping_type: MappingType::Equivalent,
                        notes: None,
                    });
                }
            }
        }
    }
    edges
}

/// The curated RELATED/SUPPORTING edges whose endpoints exist in `standards`.
///
/// Edges naming a standard that is absent are skipped; a clause number
/// missing from a present standard is an error in the curated table.
pub fn curated_references(
    standards: &[StandardWithClauses],
) -> Result<Vec<CrossReference>, CatalogError> {
    let by_code: HashMap<IsoStandard, &StandardWithClauses> =
        standards.iter().map(|s| (s.standard.code, s)).collect();

    let resolve = |code: IsoStandard, number: &str| -> Result<Option<ClauseId>, CatalogError> {
        let Some(standard) = by_code.get(&code) else {
            return Ok(None);
        };
        let number = ClauseNumber::new(number)?;
        standard
            .clause(&number)
            .map(|c| Some(c.id))
            .ok_or(CatalogError::UnknownClause {
                standard: code,
                number,
            })
    };

    let mut edges = Vec::new();
    for (src_code, src_num, dst_code, dst_num, mapping_type, notes) in CURATED {
        let (Some(source), Some(target)) =
            (resolve(*src_code, src_num)?, resolve(*dst_code, dst_num)?)
        else {
            tracing::debug!(
                source = %src_code,
                target = %dst_code,
                "skipping curated cross-reference with absent standard"
            );
            continue;
        };
        edges.push(CrossReference {
            source_clause_id: source,
            target_clause_id: target,
            mapping_type: *mapping_type,
            notes: Some((*notes).to_string()),
        });
    }
    Ok(edges)
}
