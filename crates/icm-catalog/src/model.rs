//! # Catalog Model
//!
//! Reference records for standards, clauses and cross-reference edges. These
//! are immutable at runtime: seeded once, read by every tenant.

use icm_core::{ClauseId, ClauseNumber, IsoStandard, MappingType, StandardId};
use serde::{Deserialize, Serialize};

/// An ISO standard in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    pub id: StandardId,
    pub code: IsoStandard,
    pub name: String,
    /// Only active standards participate in gap analysis and the browser.
    pub is_active: bool,
}

/// A clause (`parent_id == None`) or sub-clause of one standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: ClauseId,
    pub standard_id: StandardId,
    pub clause_number: ClauseNumber,
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Option<ClauseId>,
}

impl Clause {
    /// A clause without a parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A standard together with its full clause list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardWithClauses {
    pub standard: Standard,
    pub clauses: Vec<Clause>,
}

impl StandardWithClauses {
    /// Find a clause by number.
    pub fn clause(&self, number: &ClauseNumber) -> Option<&Clause> {
        self.clauses.iter().find(|c| &c.clause_number == number)
    }

    /// Clauses without a parent, in stored order.
    pub fn top_level(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.is_top_level())
    }
}

/// A typed edge between two clauses.
///
/// Stored directed, consumed undirected: lookups must match either endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub source_clause_id: ClauseId,
    pub target_clause_id: ClauseId,
    pub mapping_type: MappingType,
    pub notes: Option<String>,
}

impl CrossReference {
    /// Whether `clause` is either endpoint.
    pub fn touches(&self, clause: ClauseId) -> bool {
        self.source_clause_id == clause || self.target_clause_id == clause
    }

    /// The endpoint opposite `clause`, or `None` if the edge does not touch it.
    ///
    /// For a self-referencing edge the clause itself is returned.
    pub fn other_end(&self, clause: ClauseId) -> Option<ClauseId> {
        if self.source_clause_id == clause {
            Some(self.target_clause_id)
        } else if self.target_clause_id == clause {
            Some(self.source_clause_id)
        } else {
            None
        }
    }
}

/// A clause resolved together with its standard's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseRef {
    pub clause_id: ClauseId,
    pub clause_number: ClauseNumber,
    pub title: String,
    pub standard_id: StandardId,
    pub standard_code: IsoStandard,
    pub standard_name: String,
}

impl ClauseRef {
    /// Resolve a clause against its standard.
    pub fn new(standard: &Standard, clause: &Clause) -> Self {
        Self {
            clause_id: clause.id,
            clause_number: clause.clause_number.clone(),
            title: clause.title.clone(),
            standard_id: standard.id,
            standard_code: standard.code,
            standard_name: standard.name.clone(),
        }
    }
}
