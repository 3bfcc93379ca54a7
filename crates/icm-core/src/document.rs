//! # Evidence Document Status
//!
//! Lifecycle status of an evidence document and the confidence score
//! attached to a document-to-clause classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IcmError;

/// Lifecycle status of an evidence document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Uploaded, not yet submitted for review.
    Draft,
    /// Awaiting reviewer approval.
    PendingReview,
    /// Approved and in force.
    Active,
    /// Retired by the organization.
    Archived,
    /// Past its review or validity date.
    Expired,
}

impl DocumentStatus {
    /// Whether classifications on a document in this status count as evidence.
    ///
    /// Archived and expired documents never count.
    pub fn counts_as_evidence(&self) -> bool {
        !matches!(self, Self::Archived | Self::Expired)
    }

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingReview => "PENDING_REVIEW",
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = IcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PENDING_REVIEW" => Ok(Self::PendingReview),
            "ACTIVE" => Ok(Self::Active),
            "ARCHIVED" => Ok(Self::Archived),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(IcmError::UnknownDocumentStatus(other.to_string())),
        }
    }
}

/// Classifier confidence in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Threshold below which auto-classifications are discarded by default.
    pub const DEFAULT_THRESHOLD: Confidence = Confidence(0.8);

    /// Validate a confidence value. NaN and out-of-range values are rejected.
    pub fn new(value: f64) -> Result<Self, IcmError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(IcmError::InvalidConfidence(value));
        }
        Ok(Self(value))
    }

    /// The raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = IcmError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archived_and_expired_do_not_count() {
        assert!(DocumentStatus::Active.counts_as_evidence());
        assert!(DocumentStatus::Draft.counts_as_evidence());
        assert!(DocumentStatus::PendingReview.counts_as_evidence());
        assert!(!DocumentStatus::Archived.counts_as_evidence());
        assert!(!DocumentStatus::Expired.counts_as_evidence());
    }

    #[test]
    fn status_parses_wire_form() {
        assert_eq!(
            "PENDING_REVIEW".parse::<DocumentStatus>().unwrap(),
            DocumentStatus::PendingReview
        );
        assert!("active".parse::<DocumentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&DocumentStatus::PendingReview).unwrap(),
            "\"PENDING_REVIEW\""
        );
    }

    #[test]
    fn confidence_bounds() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert!(Confidence::new(-0.01).is_err());
        assert!(Confidence::new(1.01).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
        assert!(serde_json::from_str::<Confidence>("1.5").is_err());
    }
}
