//! # Cross-Reference Mapping Types
//!
//! The kind of semantic overlap asserted by a cross-reference edge.
//! Declaration order is display order: equivalences first, then related
//! requirements, then supporting ones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IcmError;

/// Semantic relationship between two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingType {
    /// Same requirement under the shared High Level Structure.
    Equivalent,
    /// Overlapping intent across differently numbered clauses.
    Related,
    /// One clause's evidence supports the other.
    Supporting,
}

impl MappingType {
    /// All mapping types in display order.
    pub fn all() -> &'static [MappingType] {
        &[Self::Equivalent, Self::Related, Self::Supporting]
    }

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equivalent => "EQUIVALENT",
            Self::Related => "RELATED",
            Self::Supporting => "SUPPORTING",
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingType {
    type Err = IcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EQUIVALENT" => Ok(Self::Equivalent),
            "RELATED" => Ok(Self::Related),
            "SUPPORTING" => Ok(Self::Supporting),
            other => Err(IcmError::UnknownMappingType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ord_is_display_order() {
        let mut types = vec![
            MappingType::Supporting,
            MappingType::Equivalent,
            MappingType::Related,
        ];
        types.sort();
        assert_eq!(types, MappingType::all());
    }

    #[test]
    fn serde_matches_as_str() {
        for t in MappingType::all() {
            assert_eq!(serde_json::to_string(t).unwrap(), format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<MappingType>().unwrap(), *t);
        }
        assert!("equivalent".parse::<MappingType>().is_err());
    }
}
