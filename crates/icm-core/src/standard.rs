//! # ISO Standards: Single Source of Truth
//!
//! Defines the `IsoStandard` enum with the seven management-system standards
//! the catalog supports. Every `match` on `IsoStandard` must be exhaustive:
//! adding a standard forces every consumer to handle it at compile time.
//!
//! All seven share the High Level Structure (HLS): clauses 4 through 10
//! carry the same numbering and intent across standards, which is what makes
//! cross-standard equivalence possible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IcmError;

/// The ISO management-system standards tracked by the catalog.
///
/// | Code     | Standard | Discipline |
/// |----------|----------|------------|
/// | ISO9001  | ISO 9001:2015  | Quality |
/// | ISO14001 | ISO 14001:2015 | Environment |
/// | ISO45001 | ISO 45001:2018 | Occupational health & safety |
/// | ISO22301 | ISO 22301:2019 | Business continuity |
/// | ISO27001 | ISO 27001:2022 | Information security |
/// | ISO37001 | ISO 37001:2016 | Anti-bribery |
/// | ISO39001 | ISO 39001:2012 | Road traffic safety |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsoStandard {
    /// Quality management systems.
    #[serde(rename = "ISO9001")]
    Iso9001,
    /// Environmental management systems.
    #[serde(rename = "ISO14001")]
    Iso14001,
    /// Occupational health and safety management systems.
    #[serde(rename = "ISO45001")]
    Iso45001,
    /// Business continuity management systems.
    #[serde(rename = "ISO22301")]
    Iso22301,
    /// Information security management systems.
    #[serde(rename = "ISO27001")]
    Iso27001,
    /// Anti-bribery management systems.
    #[serde(rename = "ISO37001")]
    Iso37001,
    /// Road traffic safety management systems.
    #[serde(rename = "ISO39001")]
    Iso39001,
}

/// Total number of supported standards.
pub const ISO_STANDARD_COUNT: usize = 7;

impl IsoStandard {
    /// Returns all standards in catalog order.
    pub fn all() -> &'static [IsoStandard] {
        &[
            Self::Iso9001,
            Self::Iso14001,
            Self::Iso45001,
            Self::Iso22301,
            Self::Iso27001,
            Self::Iso37001,
            Self::Iso39001,
        ]
    }

    /// The unique catalog code, e.g. `"ISO9001"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso9001 => "ISO9001",
            Self::Iso14001 => "ISO14001",
            Self::Iso45001 => "ISO45001",
            Self::Iso22301 => "ISO22301",
            Self::Iso27001 => "ISO27001",
            Self::Iso37001 => "ISO37001",
            Self::Iso39001 => "ISO39001",
        }
    }

    /// Human-readable name including the edition year.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso9001 => "ISO 9001:2015 Quality Management Systems",
            Self::Iso14001 => "ISO 14001:2015 Environmental Management Systems",
            Self::Iso45001 => "ISO 45001:2018 Occupational Health and Safety Management Systems",
            Self::Iso22301 => "ISO 22301:2019 Business Continuity Management Systems",
            Self::Iso27001 => "ISO 27001:2022 Information Security Management Systems",
            Self::Iso37001 => "ISO 37001:2016 Anti-bribery Management Systems",
            Self::Iso39001 => "ISO 39001:2012 Road Traffic Safety Management Systems",
        }
    }
}

impl fmt::Display for IsoStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IsoStandard {
    type Err = IcmError;

    /// Parse a standard from its catalog code. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ISO9001" => Ok(Self::Iso9001),
            "ISO14001" => Ok(Self::Iso14001),
            "ISO45001" => Ok(Self::Iso45001),
            "ISO22301" => Ok(Self::Iso22301),
            "ISO27001" => Ok(Self::Iso27001),
            "ISO37001" => Ok(Self::Iso37001),
            "ISO39001" => Ok(Self::Iso39001),
            other => Err(IcmError::UnknownStandard(other.to_string())),
        }
    }
}
