//! # icm-catalog: Clause Catalog and Cross-Reference Graph
//!
//! Global reference data shared by every tenant:
//!
//! - **Model** (`model.rs`): `Standard`, `Clause`, `CrossReference`, and the
//!   resolved `ClauseRef` used for drill-down listings.
//!
//! - **Tree** (`tree.rs`): `ClauseTree`, an arena of one standard's clauses
//!   with a parent→children index, built once per request.
//!
//! - **Seed** (`seed.rs`): the seven standards with the HLS skeleton
//!   (clauses 4 to 10 and their shared sub-clauses) plus standard-specific
//!   sub-clauses, under deterministic ids.
//!
//! - **Graph** (`graph.rs`): `CrossReferenceGraph` with duplicate-edge
//!   rejection, systematic EQUIVALENT generation across the HLS, and the
//!   curated RELATED/SUPPORTING edges.
//!
//! Nothing in this crate is tenant-scoped.

pub mod error;
pub mod graph;
pub mod model;
pub mod seed;
pub mod tree;

pub use error::CatalogError;
pub use graph::{curated_references, generate_equivalences, CrossReferenceGraph};
pub use model::{Clause, ClauseRef, CrossReference, Standard, StandardWithClauses};
pub use seed::{is_hls_number, seed_catalog, seed_standard, SeedCatalog, HLS_SUB_CLAUSES, HLS_TOP_LEVEL};
pub use tree::ClauseTree;
