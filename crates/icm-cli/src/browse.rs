//! # Cross-Reference Browsing CLI
//!
//! ```bash
//! icm matrix              # HLS rows × standards, mapping types per cell
//! icm overlap --json      # pairwise edge counts with the edges behind them
//! icm xref ISO27001 8.2   # everything mapped to one clause
//! icm catalog             # the seed catalog, clause by clause
//! ```

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;

use icm_api::AppConfig;
use icm_catalog::{seed_catalog, StandardWithClauses};
use icm_core::{ClauseId, ClauseNumber, IsoStandard, MappingType};
use icm_gap::{CrossRefItem, CrossReferenceMatrix, StandardOverlap};

use crate::source;

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct XrefArgs {
    /// Standard code, e.g. ISO27001.
    pub standard: String,
    /// Clause number, e.g. 8.2.
    pub clause: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run_matrix(args: &OutputArgs, config: &AppConfig) -> Result<u8> {
    let matrix = source::open(config, None).await?.browser().matrix().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        print!("{}", render_matrix(&matrix));
    }
    Ok(0)
}

pub async fn run_overlap(args: &OutputArgs, config: &AppConfig) -> Result<u8> {
    let overlap = source::open(config, None).await?.browser().overlap().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&overlap)?);
    } else {
        print!("{}", render_overlap(&overlap));
    }
    Ok(0)
}

pub async fn run_xref(args: &XrefArgs, config: &AppConfig) -> Result<u8> {
    let code: IsoStandard = args.standard.parse()?;
    let number = ClauseNumber::new(args.clause.as_str())?;
    let clause = ClauseId::for_clause(code, &number);

    let items = source::open(config, None)
        .await?
        .browser()
        .clause_references(clause)
        .await
        .with_context(|| format!("failed to load cross-references for {code} {number}"))?;
    if args.output.json {
        println!("{}", serde_json::to_string_pretty(items.as_ref())?);
    } else {
        print!("{}", render_references(code, &number, &items));
    }
    Ok(0)
}

/// Print the seed catalog. Reads no database.
pub fn run_catalog(args: &OutputArgs) -> Result<u8> {
    let catalog = seed_catalog()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog.standards)?);
    } else {
        print!("{}", render_catalog(&catalog.standards));
        println!("{} cross-references", catalog.cross_references.len());
    }
    Ok(0)
}

fn mapping_initial(mapping: MappingType) -> char {
    match mapping {
        MappingType::Equivalent => 'E',
        MappingType::Related => 'R',
        MappingType::Supporting => 'S',
    }
}

/// Grid of HLS top-level rows against standards. Each cell lists the
/// initials of the mapping types touching that clause (`E`, `R`, `S`).
pub fn render_matrix(matrix: &CrossReferenceMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<6}", "");
    for standard in &matrix.standards {
        let _ = write!(out, "{:>10}", standard.code.as_str());
    }
    out.push('\n');

    for row in CrossReferenceMatrix::rows() {
        let _ = write!(out, "{row:<6}");
        let Ok(number) = ClauseNumber::new(row) else {
            continue;
        };
        for standard in &matrix.standards {
            let cell: String = matrix
                .cell(&number, standard.code)
                .into_iter()
                .map(mapping_initial)
                .collect();
            let cell = if cell.is_empty() { "-".to_string() } else { cell };
            let _ = write!(out, "{cell:>10}");
        }
        out.push('\n');
    }
    out
}

pub fn render_overlap(overlap: &StandardOverlap) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<10}", "");
    for standard in &overlap.standards {
        let _ = write!(out, "{:>10}", standard.code.as_str());
    }
    out.push('\n');
    for (standard, row) in overlap.standards.iter().zip(&overlap.matrix) {
        let _ = write!(out, "{:<10}", standard.code.as_str());
        for count in row {
            let _ = write!(out, "{count:>10}");
        }
        out.push('\n');
    }
    out
}

pub fn render_references(code: IsoStandard, number: &ClauseNumber, items: &[CrossRefItem]) -> String {
    if items.is_empty() {
        return format!("{code} {number}: no cross-references\n");
    }
    let mut out = format!("{code} {number}:\n");
    for item in items {
        let _ = write!(
            out,
            "  {:<10} {:<9} {:<6} {}",
            item.mapping_type.as_str(),
            item.standard_code.as_str(),
            item.clause_number.as_str(),
            item.title,
        );
        if let Some(notes) = &item.notes {
            let _ = write!(out, " ({notes})");
        }
        out.push('\n');
    }
    out
}

pub fn render_catalog(standards: &[StandardWithClauses]) -> String {
    let mut out = String::new();
    for entry in standards {
        let _ = writeln!(
            out,
            "{} {} ({} clauses)",
            entry.standard.code,
            entry.standard.name,
            entry.clauses.len()
        );
        for clause in &entry.clauses {
            let indent = if clause.is_top_level() { "  " } else { "    " };
            let _ = writeln!(
                out,
                "{indent}{:<6} {}",
                clause.clause_number.as_str(),
                clause.title
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_gap::CrossReferenceBrowser;
    use std::sync::Arc;

    fn browser() -> CrossReferenceBrowser {
        CrossReferenceBrowser::from_store(Arc::new(source::memory_store(None).unwrap()))
    }

    #[tokio::test]
    async fn seed_matrix_marks_every_cell_equivalent() {
        let text = render_matrix(&browser().matrix().await.unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + CrossReferenceMatrix::rows().len());
        assert!(lines[0].contains("ISO9001"));
        assert!(lines[1].starts_with("4 "));
        assert!(!text.contains(" -"));
    }

    #[tokio::test]
    async fn overlap_table_is_square() {
        let text = render_overlap(&browser().overlap().await.unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + IsoStandard::all().len());
        for line in &lines[1..] {
            assert_eq!(line.split_whitespace().count(), 1 + IsoStandard::all().len());
        }
    }

    #[tokio::test]
    async fn xref_lists_curated_edge_for_standard_specific_clause() {
        let number = ClauseNumber::new("8.2").unwrap();
        let clause = ClauseId::for_clause(IsoStandard::Iso27001, &number);
        let items = browser().clause_references(clause).await.unwrap();
        let text = render_references(IsoStandard::Iso27001, &number, &items);

        assert_eq!(items.len(), 1);
        assert!(text.starts_with("ISO27001 8.2:\n"));
        assert!(text.contains("RELATED    ISO22301  8.2"));
    }

    #[tokio::test]
    async fn xref_for_unmapped_clause_says_so() {
        let number = ClauseNumber::new("99").unwrap();
        let clause = ClauseId::for_clause(IsoStandard::Iso9001, &number);
        let items = browser().clause_references(clause).await.unwrap();
        assert_eq!(
            render_references(IsoStandard::Iso9001, &number, &items),
            "ISO9001 99: no cross-references\n"
        );
    }

    #[test]
    fn catalog_lists_every_standard() {
        let catalog = seed_catalog().unwrap();
        let text = render_catalog(&catalog.standards);
        for code in IsoStandard::all() {
            assert!(text.contains(code.as_str()));
        }
    }
}
