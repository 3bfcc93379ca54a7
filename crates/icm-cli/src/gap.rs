//! # Gap Analysis CLI
//!
//! ```bash
//! icm gap --org acme --evidence evidence.yaml
//! icm gap --org acme --standard ISO27001 --project p-1 --json
//! icm gap --org acme --evidence evidence.yaml --opportunities
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use icm_api::AppConfig;
use icm_core::{IsoStandard, OrganizationId, ProjectId};
use icm_gap::{GapAnalysisQuery, GapAnalysisSummary, IntegrationOpportunity};

use crate::source;

#[derive(Args, Debug)]
pub struct GapArgs {
    /// Organization whose evidence is scored.
    #[arg(long)]
    pub org: String,

    /// Restrict to one standard code, e.g. ISO9001.
    #[arg(long)]
    pub standard: Option<String>,

    /// Restrict evidence to one project.
    #[arg(long)]
    pub project: Option<String>,

    /// Evidence fixture (.json, .yaml, .yml). Ignored with DATABASE_URL.
    #[arg(long)]
    pub evidence: Option<PathBuf>,

    /// List integration opportunities instead of the full analysis.
    #[arg(long)]
    pub opportunities: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl GapArgs {
    fn query(&self) -> Result<GapAnalysisQuery> {
        let standard = self
            .standard
            .as_deref()
            .map(str::parse::<IsoStandard>)
            .transpose()?;
        let project = self.project.clone().map(ProjectId::new).transpose()?;
        Ok(GapAnalysisQuery::for_organization(OrganizationId::new(self.org.clone())?)
            .with_standard(standard)
            .with_project(project))
    }
}

/// Execute the gap subcommand.
pub async fn run_gap(args: &GapArgs, config: &AppConfig) -> Result<u8> {
    let query = args.query()?;
    let state = source::open(config, args.evidence.as_deref()).await?;

    if args.opportunities {
        let items = state.engine.opportunities(&query).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            print!("{}", render_opportunities(&items));
        }
    } else {
        let summary = state.engine.compute(&query).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", render_summary(&summary));
        }
    }
    Ok(0)
}

/// Text report: one block per standard, top-level clauses with their
/// listed children.
pub fn render_summary(summary: &GapAnalysisSummary) -> String {
    let mut out = String::new();
    for standard in &summary.standards {
        let _ = writeln!(
            out,
            "{} {}: {}% ({} covered, {} partial, {} gaps of {})",
            standard.code,
            standard.name,
            standard.coverage_percent,
            standard.covered,
            standard.partial,
            standard.gaps,
            standard.total_sub_clauses,
        );
        for clause in &standard.clauses {
            let _ = writeln!(
                out,
                "  {:<6} {:<8} {}",
                clause.clause_number.as_str(),
                clause.status.as_str(),
                clause.title
            );
            for child in &clause.children {
                let _ = writeln!(
                    out,
                    "    {:<6} {:<8} docs={} checklist={}/{} xrefs={}  {}",
                    child.clause_number.as_str(),
                    child.status.as_str(),
                    child.doc_count,
                    child.checklist_compliant_count,
                    child.checklist_total_count,
                    child.cross_ref_count,
                    child.title,
                );
            }
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "Overall: {}% ({} of {} clauses covered)",
        summary.overall_coverage_percent, summary.covered, summary.total_sub_clauses
    );
    out
}

pub fn render_opportunities(items: &[IntegrationOpportunity]) -> String {
    if items.is_empty() {
        return "No integration opportunities.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:<9} {:<6} {:<8} xrefs={:<3} {}",
            item.code.as_str(),
            item.clause_number.as_str(),
            item.status.as_str(),
            item.cross_ref_count,
            item.title,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(standard: Option<&str>) -> GapArgs {
        GapArgs {
            org: "acme".into(),
            standard: standard.map(String::from),
            project: None,
            evidence: None,
            opportunities: false,
            json: false,
        }
    }

    #[test]
    fn query_parses_standard() {
        let query = args(Some("ISO45001")).query().unwrap();
        assert_eq!(query.standard, Some(IsoStandard::Iso45001));
        assert!(args(Some("ISO1")).query().is_err());
    }

    #[tokio::test]
    async fn seed_report_without_evidence_is_all_gaps() {
        let store = std::sync::Arc::new(source::memory_store(None).unwrap());
        let engine = icm_gap::GapAnalysisEngine::from_store(store);
        let summary = engine.compute(&args(Some("ISO9001")).query().unwrap()).await.unwrap();

        let text = render_summary(&summary);
        assert!(text.starts_with("ISO9001 "));
        assert!(text.contains("  4      GAP"));
        assert!(text.contains("Overall: 0% (0 of"));
    }

    #[test]
    fn empty_opportunities_render_a_notice() {
        assert_eq!(render_opportunities(&[]), "No integration opportunities.\n");
    }
}
