//! # Error Types
//!
//! Validation errors raised at the boundary when parsing identifiers,
//! standard codes, clause numbers, organization settings and checklist
//! field configurations. All errors use `thiserror`.

use thiserror::Error;

/// Top-level validation error for ICM core types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IcmError {
    /// An identifier was empty or malformed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A standard code did not match any known ISO standard.
    #[error("unknown standard code: {0:?}")]
    UnknownStandard(String),

    /// A clause number was not a dotted sequence of alphanumeric segments.
    #[error("invalid clause number: {0:?}")]
    InvalidClauseNumber(String),

    /// A mapping type string was not EQUIVALENT, RELATED or SUPPORTING.
    #[error("unknown mapping type: {0:?}")]
    UnknownMappingType(String),

    /// A document status string was not recognized.
    #[error("unknown document status: {0:?}")]
    UnknownDocumentStatus(String),

    /// A clause ordering string was not recognized.
    #[error("unknown clause ordering: {0:?}")]
    UnknownOrdering(String),

    /// A classification confidence was outside `0.0..=1.0`.
    #[error("confidence must be within 0.0..=1.0, got {0}")]
    InvalidConfidence(f64),

    /// An organization setting failed validation.
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting {
        /// The offending setting field (camelCase, as serialized).
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A checklist field configuration is internally inconsistent.
    #[error("invalid field config: {0}")]
    InvalidFieldConfig(String),

    /// A checklist response does not satisfy its field configuration.
    #[error("invalid checklist response: {0}")]
    InvalidResponse(String),
}
