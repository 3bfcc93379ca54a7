//! # Organization Settings
//!
//! Per-tenant feature toggles as a closed, typed struct. Updates arrive as an
//! [`OrgSettingsPatch`] in which every field is optional: only the keys
//! present in the patch overwrite the stored value, everything else is kept.
//!
//! `defaultStandard` is nullable, so its patch field distinguishes "absent"
//! (keep) from explicit `null` (clear).

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::Confidence;
use crate::error::IcmError;
use crate::standard::IsoStandard;

/// Inclusive bounds for `expiryWarningDays`.
pub const EXPIRY_WARNING_DAYS_RANGE: std::ops::RangeInclusive<u32> = 1..=365;

/// Typed organization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgSettings {
    /// Standard preselected in dashboards, if any.
    pub default_standard: Option<IsoStandard>,
    /// Standards the organization works against, in catalog order.
    pub enabled_standards: Vec<IsoStandard>,
    /// Days before expiry at which document owners are warned.
    pub expiry_warning_days: u32,
    /// Whether uploaded documents are auto-classified against clauses.
    pub auto_classification: bool,
    /// Minimum classifier confidence for an auto-classification to be kept.
    pub min_classification_confidence: Confidence,
    /// Whether newly detected gaps trigger notifications.
    pub notify_on_new_gaps: bool,
}

impl Default for OrgSettings {
    fn default() -> Self {
        Self {
            default_standard: None,
            enabled_standards: IsoStandard::all().to_vec(),
            expiry_warning_days: 30,
            auto_classification: true,
            min_classification_confidence: Confidence::DEFAULT_THRESHOLD,
            notify_on_new_gaps: true,
        }
    }
}

/// Partial update to [`OrgSettings`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSettingsPatch {
    /// `Some(None)` clears the default standard; `None` keeps it.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_standard: Option<Option<IsoStandard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_standards: Option<Vec<IsoStandard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_warning_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_classification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_classification_confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_new_gaps: Option<bool>,
}

/// Maps a present JSON value (including `null`) to `Some(..)`.
/// Combined with `#[serde(default)]`, an absent key stays `None`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl OrgSettingsPatch {
    /// Whether the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl OrgSettings {
    /// Apply a patch, overwriting only the provided keys, and validate the result.
    ///
    /// The receiver is left untouched; on validation failure nothing is applied.
    pub fn merge(&self, patch: &OrgSettingsPatch) -> Result<OrgSettings, IcmError> {
        let mut next = self.clone();
        if let Some(default_standard) = patch.default_standard {
            next.default_standard = default_standard;
        }
        if let Some(enabled) = &patch.enabled_standards {
            next.enabled_standards = normalize_standards(enabled);
        }
        if let Some(days) = patch.expiry_warning_days {
            next.expiry_warning_days = days;
        }
        if let Some(auto) = patch.auto_classification {
            next.auto_classification = auto;
        }
        if let Some(confidence) = patch.min_classification_confidence {
            next.min_classification_confidence = confidence;
        }
        if let Some(notify) = patch.notify_on_new_gaps {
            next.notify_on_new_gaps = notify;
        }
        next.validate()?;
        Ok(next)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), IcmError> {
        if !EXPIRY_WARNING_DAYS_RANGE.contains(&self.expiry_warning_days) {
            return Err(IcmError::InvalidSetting {
                field: "expiryWarningDays",
                reason: format!(
                    "must be within {}..={}, got {}",
                    EXPIRY_WARNING_DAYS_RANGE.start(),
                    EXPIRY_WARNING_DAYS_RANGE.end(),
                    self.expiry_warning_days
                ),
            });
        }
        if self.enabled_standards.is_empty() {
            return Err(IcmError::InvalidSetting {
                field: "enabledStandards",
                reason: "at least one standard must be enabled".to_string(),
            });
        }
        if let Some(default) = self.default_standard {
            if !self.enabled_standards.contains(&default) {
                return Err(IcmError::InvalidSetting {
                    field: "defaultStandard",
                    reason: format!("{default} is not among the enabled standards"),
                });
            }
        }
        Ok(())
    }
}

/// Deduplicate and put standards in catalog order.
fn normalize_standards(standards: &[IsoStandard]) -> Vec<IsoStandard> {
    IsoStandard::all()
        .iter()
        .copied()
        .filter(|s| standards.contains(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = OrgSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.enabled_standards.len(), 7);
        assert_eq!(settings.min_classification_confidence.value(), 0.8);
    }

    #[test]
    fn merge_overwrites_only_provided_keys() {
        let base = OrgSettings::default();
        let patch: OrgSettingsPatch =
            serde_json::from_str(r#"{"expiryWarningDays": 14}"#).unwrap();
        let merged = base.merge(&patch).unwrap();
        assert_eq!(merged.expiry_warning_days, 14);
        assert_eq!(merged.enabled_standards, base.enabled_standards);
        assert_eq!(merged.auto_classification, base.auto_classification);
        assert_eq!(merged.notify_on_new_gaps, base.notify_on_new_gaps);
    }

    #[test]
    fn explicit_null_clears_default_standard() {
        let base = OrgSettings::default()
            .merge(&OrgSettingsPatch {
                default_standard: Some(Some(IsoStandard::Iso27001)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(base.default_standard, Some(IsoStandard::Iso27001));

        let absent: OrgSettingsPatch = serde_json::from_str("{}").unwrap();
        assert!(absent.is_empty());
        assert_eq!(
            base.merge(&absent).unwrap().default_standard,
            Some(IsoStandard::Iso27001)
        );

        let cleared: OrgSettingsPatch =
            serde_json::from_str(r#"{"defaultStandard": null}"#).unwrap();
        assert_eq!(cleared.default_standard, Some(None));
        assert_eq!(base.merge(&cleared).unwrap().default_standard, None);
    }

    #[test]
    fn enabled_standards_are_normalized() {
        let merged = OrgSettings::default()
            .merge(&OrgSettingsPatch {
                enabled_standards: Some(vec![
                    IsoStandard::Iso27001,
                    IsoStandard::Iso9001,
                    IsoStandard::Iso27001,
                ]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            merged.enabled_standards,
            vec![IsoStandard::Iso9001, IsoStandard::Iso27001]
        );
    }

    #[test]
    fn invalid_merge_is_rejected_without_partial_apply() {
        let base = OrgSettings::default();
        let err = base
            .merge(&OrgSettingsPatch {
                expiry_warning_days: Some(0),
                auto_classification: Some(false),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            IcmError::InvalidSetting { field: "expiryWarningDays", .. }
        ));
        assert!(base.auto_classification);
    }

    #[test]
    fn default_standard_must_be_enabled() {
        let err = OrgSettings::default()
            .merge(&OrgSettingsPatch {
                default_standard: Some(Some(IsoStandard::Iso39001)),
                enabled_standards: Some(vec![IsoStandard::Iso9001]),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            IcmError::InvalidSetting { field: "defaultStandard", .. }
        ));
    }

    #[test]
    fn missing_keys_in_stored_json_fall_back_to_defaults() {
        let settings: OrgSettings =
            serde_json::from_str(r#"{"autoClassification": false}"#).unwrap();
        assert!(!settings.auto_classification);
        assert_eq!(settings.expiry_warning_days, 30);
    }
}
