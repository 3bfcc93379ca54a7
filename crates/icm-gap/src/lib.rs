//! # icm-gap: Gap Analysis and Cross-Reference Browser
//!
//! Turns an organization's evidence into per-clause coverage:
//!
//! - **Store ports** (`store.rs`): the four async reads the engine needs.
//!   Evidence reads are tenant-scoped; catalog and graph reads are global.
//!
//! - **Evidence** (`evidence.rs`): documents, classifications, checklists
//!   and items, folded into an [`EvidenceIndex`] keyed by clause id.
//!
//! - **Status** (`status.rs`): the COVERED / PARTIAL / GAP leaf rule and
//!   its roll-up to top-level clauses.
//!
//! - **Engine** (`engine.rs`): concurrent reads, then pure aggregation into a
//!   [`GapAnalysisSummary`].
//!
//! - **Browser** (`browser.rs`): the cross-reference matrix, pairwise
//!   standard overlap, and per-clause drill-down, memoized per request.
//!
//! - **Insights** (`insights.rs`): uncovered clauses with cross-references.
//!
//! - **Memory store** (`memory.rs`): a `parking_lot`-backed implementation
//!   of every port.

pub mod analysis;
pub mod browser;
pub mod engine;
pub mod evidence;
pub mod insights;
pub mod memo;
pub mod memory;
pub mod status;
pub mod store;

pub use analysis::{
    coverage_percent, ClauseGapData, GapAnalysisSummary, StandardGapAnalysis, TopLevelClauseGap,
};
pub use browser::{
    pair_key, CrossRefItem, CrossReferenceBrowser, CrossReferenceMatrix, OverlapReference,
    StandardOverlap,
};
pub use engine::{analyze, GapAnalysisEngine, GapAnalysisQuery};
pub use evidence::{
    Checklist, ChecklistItem, ChecklistTally, DocumentClassification, EvidenceDocument,
    EvidenceIndex, EvidenceSet,
};
pub use insights::{integration_opportunities, IntegrationOpportunity};
pub use memo::RequestMemo;
pub use memory::MemoryStore;
pub use status::CoverageStatus;
pub use store::{
    ChecklistEvidenceStore, ClauseCatalogStore, CrossReferenceStore, DocumentEvidenceStore,
    StoreError,
};
