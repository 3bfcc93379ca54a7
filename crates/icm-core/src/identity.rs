//! # Identifier Newtypes
//!
//! Newtype wrappers for tenant identifiers and catalog identifiers.
//!
//! ## Tenant vs Catalog Identifiers
//!
//! `OrganizationId` and `ProjectId` are opaque strings owned by the
//! surrounding application (auth context). `StandardId` and `ClauseId` name
//! global reference data shared by every tenant. Keeping them as distinct
//! types prevents scoping a catalog query by tenant, or an evidence query by
//! a catalog id, by accident.
//!
//! Catalog ids are deterministic: [`StandardId::for_code`] and
//! [`ClauseId::for_clause`] derive UUID v5 values from the standard code and
//! clause number, so reseeding the catalog reproduces the same ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clause::ClauseNumber;
use crate::error::IcmError;
use crate::standard::IsoStandard;

/// Namespace for deterministic catalog identifiers.
const CATALOG_NAMESPACE: Uuid = Uuid::from_u128(0x3b0e_4c1a_9d2f_4e77_a6c5_1f08_d2e9_7c41);

/// Opaque tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

/// Opaque project identifier, scoped within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl OrganizationId {
    /// Create an organization identifier. Rejects empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, IcmError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IcmError::InvalidIdentifier(
                "organization id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ProjectId {
    /// Create a project identifier. Rejects empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, IcmError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IcmError::InvalidIdentifier(
                "project id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IcmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| IcmError::InvalidIdentifier(format!("{} {s:?}: {e}", $label)))
            }
        }
    };
}

uuid_id!(
    /// Identifier of an ISO standard in the catalog.
    StandardId,
    "standard id"
);
uuid_id!(
    /// Identifier of a clause or sub-clause in the catalog.
    ClauseId,
    "clause id"
);
uuid_id!(
    /// Identifier of an evidence document.
    DocumentId,
    "document id"
);
uuid_id!(
    /// Identifier of a compliance checklist.
    ChecklistId,
    "checklist id"
);

impl StandardId {
    /// Deterministic identifier for a seeded standard.
    pub fn for_code(code: IsoStandard) -> Self {
        Self(Uuid::new_v5(
            &CATALOG_NAMESPACE,
            format!("standard:{}", code.as_str()).as_bytes(),
        ))
    }
}

impl ClauseId {
    /// Deterministic identifier for a seeded clause.
    pub fn for_clause(code: IsoStandard, number: &ClauseNumber) -> Self {
        Self(Uuid::new_v5(
            &CATALOG_NAMESPACE,
            format!("clause:{}:{}", code.as_str(), number.as_str()).as_bytes(),
        ))
    }
}
