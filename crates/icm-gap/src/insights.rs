//! Integration insights: clauses still short of coverage that share a
//! cross-reference with another clause, where evidence may be reused.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use icm_core::{ClauseId, ClauseNumber, IsoStandard, StandardId};

use crate::analysis::GapAnalysisSummary;
use crate::status::CoverageStatus;

/// A listed clause that is not covered but is cross-referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOpportunity {
    #[schema(value_type = String)]
    pub standard_id: StandardId,
    #[schema(value_type = String, example = "ISO14001")]
    pub code: IsoStandard,
    #[schema(value_type = String)]
    pub clause_id: ClauseId,
    #[schema(value_type = String, example = "7.4")]
    pub clause_number: ClauseNumber,
    pub title: String,
    pub status: CoverageStatus,
    pub cross_ref_count: u32,
    pub doc_count: u32,
    pub checklist_compliant_count: u32,
}

/// Children listed in `summary` that are not `Covered` and have at least one
/// cross-reference, most-referenced first, then by standard code and
/// clause number.
pub fn integration_opportunities(summary: &GapAnalysisSummary) -> Vec<IntegrationOpportunity> {
    let mut out: Vec<IntegrationOpportunity> = summary
        .standards
        .iter()
        .flat_map(|s| {
            s.clauses
                .iter()
                .flat_map(|top| top.children.iter())
                .filter(|c| c.status != CoverageStatus::Covered && c.cross_ref_count > 0)
                .map(move |c| IntegrationOpportunity {
                    standard_id: s.standard_id,
                    code: s.code,
                    clause_id: c.clause_id,
                    clause_number: c.clause_number.clone(),
                    title: c.title.clone(),
                    status: c.status,
                    cross_ref_count: c.cross_ref_count,
                    doc_count: c.doc_count,
                    checklist_compliant_count: c.checklist_compliant_count,
                })
        })
        .collect();

    out.sort_by(|a, b| {
        b.cross_ref_count
            .cmp(&a.cross_ref_count)
            .then_with(|| a.code.as_str().cmp(b.code.as_str()))
            .then_with(|| a.clause_number.cmp(&b.clause_number))
    });
    out
}
