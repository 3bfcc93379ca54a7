//! Tri-state coverage and its roll-up rule.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coverage of one clause.
///
/// A leaf is `Covered` when it has both a verified document and a compliant
/// checklist item, `Partial` with exactly one, `Gap` with neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Covered,
    Partial,
    Gap,
}

impl CoverageStatus {
    /// Leaf status from its evidence counts.
    pub fn from_evidence(doc_count: u32, compliant_count: u32) -> Self {
        match (doc_count > 0, compliant_count > 0) {
            (true, true) => Self::Covered,
            (false, false) => Self::Gap,
            _ => Self::Partial,
        }
    }

    /// Parent status from its children: `Covered` iff all covered, `Gap` iff
    /// all gap, otherwise `Partial`. `None` for no children.
    pub fn roll_up(children: impl IntoIterator<Item = CoverageStatus>) -> Option<Self> {
        let mut children = children.into_iter();
        let first = children.next()?;
        Some(children.fold(first, |acc, s| if acc == s { acc } else { Self::Partial }))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Covered => "COVERED",
            Self::Partial => "PARTIAL",
            Self::Gap => "GAP",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
