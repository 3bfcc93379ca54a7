//! # API Route Modules
//!
//! - `gap`: gap analysis and integration opportunities for the caller's
//!   organization.
//! - `cross_references`: matrix, overlap and per-clause drill-down over the
//!   global cross-reference graph.
//! - `settings`: per-organization settings with merge-on-write.

pub mod cross_references;
pub mod gap;
pub mod settings;
