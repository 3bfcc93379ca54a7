//! # Gap Analysis Results
//!
//! Derived, never persisted. Serialized camelCase:
//!
//! ```text
//! GapAnalysisSummary
//!   └─ StandardGapAnalysis (one per active standard)
//!        └─ TopLevelClauseGap (top-level clauses with children)
//!             └─ ClauseGapData (sub-clause with evidence counts)
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use icm_core::{ClauseId, ClauseNumber, IsoStandard, StandardId};

use crate::status::CoverageStatus;

/// `round(covered / total * 100)`, or 0 when `total` is 0.
pub fn coverage_percent(covered: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(covered) / f64::from(total) * 100.0).round() as u32
}

/// Status and evidence counts for one leaf clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClauseGapData {
    #[schema(value_type = String)]
    pub clause_id: ClauseId,
    #[schema(value_type = String, example = "4.1")]
    pub clause_number: ClauseNumber,
    pub title: String,
    pub description: Option<String>,
    pub status: CoverageStatus,
    pub doc_count: u32,
    pub checklist_compliant_count: u32,
    pub checklist_total_count: u32,
    pub cross_ref_count: u32,
}

/// A top-level clause with its rolled-up status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelClauseGap {
    #[schema(value_type = String)]
    pub clause_id: ClauseId,
    #[schema(value_type = String, example = "4")]
    pub clause_number: ClauseNumber,
    pub title: String,
    pub description: Option<String>,
    pub status: CoverageStatus,
    pub children: Vec<ClauseGapData>,
}

/// Coverage of one standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandardGapAnalysis {
    #[schema(value_type = String)]
    pub standard_id: StandardId,
    #[schema(value_type = String, example = "ISO9001")]
    pub code: IsoStandard,
    pub name: String,
    pub coverage_percent: u32,
    /// Number of leaf clauses scored.
    pub total_sub_clauses: u32,
    pub covered: u32,
    pub partial: u32,
    pub gaps: u32,
    pub clauses: Vec<TopLevelClauseGap>,
}

/// Coverage across every analyzed standard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysisSummary {
    pub total_sub_clauses: u32,
    pub covered: u32,
    pub partial: u32,
    pub gaps: u32,
    pub overall_coverage_percent: u32,
    pub standards: Vec<StandardGapAnalysis>,
}
