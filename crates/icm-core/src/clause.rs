//! # Clause Numbers and Ordering
//!
//! A clause number is a dotted sequence of segments: `"4"`, `"4.1"`,
//! `"6.1.2"`, `"A.5"`. The derived `Ord` on [`ClauseNumber`] compares the raw
//! strings, so `"4.10"` sorts before `"4.2"`. That is the order the catalog
//! has always produced and the default everywhere.
//!
//! [`ClauseOrdering::Natural`] compares segment by segment, numerically where
//! both segments are numeric, so `"4.2"` sorts before `"4.10"`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IcmError;

/// A validated dotted clause number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClauseNumber(String);

impl ClauseNumber {
    /// Parse and validate a clause number.
    ///
    /// Every segment must be non-empty ASCII alphanumeric.
    pub fn new(raw: impl Into<String>) -> Result<Self, IcmError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .split('.')
                .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid {
            return Err(IcmError::InvalidClauseNumber(raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the raw dotted string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dotted segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The first segment, i.e. the HLS clause this number falls under.
    pub fn top_level(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    /// Segment-wise comparison with numeric segments compared as integers.
    ///
    /// A numeric segment sorts before an alphabetic one; a shorter number
    /// sorts before any number it prefixes.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.segments();
        let mut rhs = other.segments();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    let ord = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        (Ok(_), Err(_)) => Ordering::Less,
                        (Err(_), Ok(_)) => Ordering::Greater,
                        (Err(_), Err(_)) => a.cmp(b),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

impl fmt::Display for ClauseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClauseNumber {
    type Err = IcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClauseNumber {
    type Error = IcmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClauseNumber> for String {
    fn from(value: ClauseNumber) -> Self {
        value.0
    }
}

/// How clause lists are ordered within a standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseOrdering {
    /// Raw string order ("4.10" before "4.2").
    #[default]
    Lexicographic,
    /// Numeric dotted-segment order ("4.2" before "4.10").
    Natural,
}

impl ClauseOrdering {
    /// Compare two clause numbers under this ordering.
    pub fn compare(self, a: &ClauseNumber, b: &ClauseNumber) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::Natural => a.natural_cmp(b),
        }
    }

    /// The configuration string for this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexicographic => "lexicographic",
            Self::Natural => "natural",
        }
    }
}

impl FromStr for ClauseOrdering {
    type Err = IcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(Self::Lexicographic),
            "natural" => Ok(Self::Natural),
            other => Err(IcmError::UnknownOrdering(other.to_string())),
        }
    }
}
