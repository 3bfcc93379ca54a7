//! # icm-core: Foundational Types for ICM
//!
//! This crate is the leaf of the ICM workspace. It defines the type-system
//! primitives shared by the catalog, the gap analysis engine, the HTTP
//! surface and the CLI. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `OrganizationId`, `ProjectId`,
//!    `StandardId`, `ClauseId`, `DocumentId`, `ChecklistId`. You cannot pass
//!    a tenant identifier where a catalog identifier is expected.
//!
//! 2. **Single `IsoStandard` enum.** One definition, 7 variants, exhaustive
//!    `match` everywhere. Adding a standard forces every consumer to handle it.
//!
//! 3. **`ClauseNumber` owns its ordering.** The derived `Ord` is plain
//!    string-lexicographic ("4.10" < "4.2"); numeric dotted ordering is an
//!    explicit opt-in through [`ClauseOrdering::Natural`].
//!
//! 4. **Typed configuration.** Organization settings and checklist field
//!    configs are closed structs/tagged unions validated at the boundary,
//!    never opaque JSON maps.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `icm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod checklist;
pub mod clause;
pub mod document;
pub mod error;
pub mod identity;
pub mod mapping;
pub mod settings;
pub mod standard;

// Re-export primary types for ergonomic imports.
pub use checklist::{FieldConfig, FieldResponse};
pub use clause::{ClauseNumber, ClauseOrdering};
pub use document::{Confidence, DocumentStatus};
pub use error::IcmError;
pub use identity::{ChecklistId, ClauseId, DocumentId, OrganizationId, ProjectId, StandardId};
pub use mapping::MappingType;
pub use settings::{OrgSettings, OrgSettingsPatch};
pub use standard::{IsoStandard, ISO_STANDARD_COUNT};
