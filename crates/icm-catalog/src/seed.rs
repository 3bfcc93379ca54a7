//! # Seed Catalog
//!
//! The reference content loaded into a fresh deployment: seven standards,
//! the High Level Structure shared by all of them, the sub-clauses specific
//! to each standard, and the cross-reference graph over them.
//!
//! Ids are derived from `(code, clause number)`, so seeding twice yields the
//! same rows.

use icm_core::{ClauseId, ClauseNumber, IsoStandard, StandardId};

use crate::error::CatalogError;
use crate::graph::{curated_references, generate_equivalences, CrossReferenceGraph};
use crate::model::{Clause, CrossReference, Standard, StandardWithClauses};

/// HLS top-level clauses: number, title, description.
pub const HLS_TOP_LEVEL: &[(&str, &str, &str)] = &[
    (
        "4",
        "Context of the organization",
        "Understand internal and external issues, interested parties and the scope of the management system.",
    ),
    (
        "5",
        "Leadership",
        "Top management commitment, policy, and assignment of roles and responsibilities.",
    ),
    (
        "6",
        "Planning",
        "Actions to address risks and opportunities and objectives with plans to achieve them.",
    ),
    (
        "7",
        "Support",
        "Resources, competence, awareness, communication and documented information.",
    ),
    (
        "8",
        "Operation",
        "Planning, implementation and control of the processes needed to meet requirements.",
    ),
    (
        "9",
        "Performance evaluation",
        "Monitoring, measurement, analysis, internal audit and management review.",
    ),
    (
        "10",
        "Improvement",
        "Nonconformity, corrective action and continual improvement.",
    ),
];

/// HLS sub-clauses present in every standard.
pub const HLS_SUB_CLAUSES: &[(&str, &str)] = &[
    ("4.1", "Understanding the organization and its context"),
    ("4.2", "Understanding the needs and expectations of interested parties"),
    ("4.3", "Determining the scope of the management system"),
    ("4.4", "Management system"),
    ("5.1", "Leadership and commitment"),
    ("5.2", "Policy"),
    ("5.3", "Organizational roles, responsibilities and authorities"),
    ("6.1", "Actions to address risks and opportunities"),
    ("6.2", "Objectives and planning to achieve them"),
    ("7.1", "Resources"),
    ("7.2", "Competence"),
    ("7.3", "Awareness"),
    ("7.4", "Communication"),
    ("7.5", "Documented information"),
    ("8.1", "Operational planning and control"),
    ("9.1", "Monitoring, measurement, analysis and evaluation"),
    ("9.2", "Internal audit"),
    ("9.3", "Management review"),
    ("10.1", "Continual improvement"),
    ("10.2", "Nonconformity and corrective action"),
];

/// Sub-clauses that exist only in particular standards.
const STANDARD_SPECIFIC: &[(IsoStandard, &str, &str)] = &[
    (IsoStandard::Iso9001, "6.3", "Planning of changes"),
    (IsoStandard::Iso9001, "8.2", "Requirements for products and services"),
    (IsoStandard::Iso9001, "8.3", "Design and development of products and services"),
    (
        IsoStandard::Iso9001,
        "8.4",
        "Control of externally provided processes, products and services",
    ),
    (IsoStandard::Iso9001, "8.5", "Production and service provision"),
    (IsoStandard::Iso9001, "8.6", "Release of products and services"),
    (IsoStandard::Iso9001, "8.7", "Control of nonconforming outputs"),
    (IsoStandard::Iso14001, "8.2", "Emergency preparedness and response"),
    (IsoStandard::Iso45001, "5.4", "Consultation and participation of workers"),
    (IsoStandard::Iso45001, "8.2", "Emergency preparedness and response"),
    (IsoStandard::Iso22301, "8.2", "Business impact analysis and risk assessment"),
    (IsoStandard::Iso22301, "8.3", "Business continuity strategies and solutions"),
    (IsoStandard::Iso22301, "8.4", "Business continuity plans and procedures"),
    (IsoStandard::Iso22301, "8.5", "Exercise programme"),
    (
        IsoStandard::Iso22301,
        "8.6",
        "Evaluation of business continuity documentation and capabilities",
    ),
    (IsoStandard::Iso27001, "6.3", "Planning of changes"),
    (IsoStandard::Iso27001, "8.2", "Information security risk assessment"),
    (IsoStandard::Iso27001, "8.3", "Information security risk treatment"),
    (IsoStandard::Iso37001, "8.2", "Due diligence"),
    (IsoStandard::Iso37001, "8.3", "Financial controls"),
    (IsoStandard::Iso37001, "8.4", "Non-financial controls"),
    (IsoStandard::Iso39001, "6.3", "Road traffic safety performance factors"),
    (IsoStandard::Iso39001, "8.2", "Emergency preparedness and response"),
];

/// Whether a clause number belongs to the shared High Level Structure.
pub fn is_hls_number(number: &ClauseNumber) -> bool {
    let raw = number.as_str();
    HLS_TOP_LEVEL.iter().any(|(n, _, _)| *n == raw) || HLS_SUB_CLAUSES.iter().any(|(n, _)| *n == raw)
}

/// Seeded reference data: standards with clauses, plus the edge set.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    pub standards: Vec<StandardWithClauses>,
    pub cross_references: Vec<CrossReference>,
}

/// Build the full seed catalog.
pub fn seed_catalog() -> Result<SeedCatalog, CatalogError> {
    let standards = IsoStandard::all()
        .iter()
        .map(|code| seed_standard(*code))
        .collect::<Result<Vec<_>, _>>()?;

    let mut graph = CrossReferenceGraph::new();
    graph.extend(generate_equivalences(&standards))?;
    graph.extend(curated_references(&standards)?)?;

    tracing::debug!(
        standards = standards.len(),
        clauses = standards.iter().map(|s| s.clauses.len()).sum::<usize>(),
        edges = graph.len(),
        "seed catalog assembled"
    );

    Ok(SeedCatalog {
        standards,
        cross_references: graph.into_edges(),
    })
}

/// Build one standard with its HLS and standard-specific clauses.
pub fn seed_standard(code: IsoStandard) -> Result<StandardWithClauses, CatalogError> {
    let standard_id = StandardId::for_code(code);
    let mut clauses = Vec::new();

    for (number, title, description) in HLS_TOP_LEVEL {
        let number = ClauseNumber::new(*number)?;
        clauses.push(Clause {
            id: ClauseId::for_clause(code, &number),
            standard_id,
            clause_number: number,
            title: (*title).to_string(),
            description: Some((*description).to_string()),
            parent_id: None,
        });
    }

    let specific = STANDARD_SPECIFIC
        .iter()
        .filter(|(owner, _, _)| *owner == code)
        .map(|(_, number, title)| (*number, *title));

    for (number, title) in HLS_SUB_CLAUSES.iter().copied().chain(specific) {
        let number = ClauseNumber::new(number)?;
        let parent = ClauseNumber::new(number.top_level())?;
        clauses.push(Clause {
            id: ClauseId::for_clause(code, &number),
            standard_id,
            parent_id: Some(ClauseId::for_clause(code, &parent)),
            clause_number: number,
            title: title.to_string(),
            description: None,
        });
    }

    clauses.sort_by(|a, b| a.clause_number.cmp(&b.clause_number));

    Ok(StandardWithClauses {
        standard: Standard {
            id: standard_id,
            code,
            name: code.name().to_string(),
            is_active: true,
        },
        clauses,
    })
}
