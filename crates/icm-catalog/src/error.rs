//! Errors raised while assembling catalog reference data.

use icm_core::{ClauseId, ClauseNumber, IcmError, IsoStandard};
use thiserror::Error;

/// Error building the catalog or the cross-reference graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// An edge for the same ordered (source, target) pair already exists.
    #[error("duplicate cross-reference {source_clause} -> {target_clause}")]
    DuplicateEdge {
        /// Source clause of the rejected edge.
        source_clause: ClauseId,
        /// Target clause of the rejected edge.
        target_clause: ClauseId,
    },

    /// An edge would connect a clause to itself.
    #[error("cross-reference from clause {0} to itself")]
    SelfReference(ClauseId),

    /// A clause number referenced by catalog data is not in the catalog.
    #[error("clause {number} not found in {standard}")]
    UnknownClause {
        /// Standard searched.
        standard: IsoStandard,
        /// Clause number that was not found.
        number: ClauseNumber,
    },

    /// Seed data failed core validation.
    #[error("invalid seed data: {0}")]
    InvalidSeed(#[from] IcmError),
}
