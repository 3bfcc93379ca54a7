//! # Checklist Field Configuration
//!
//! A checklist item may carry a typed answer field. The field shape is a
//! tagged union keyed on `kind`, and the recorded response is a matching
//! tagged value. Both are validated when they cross into the system
//! (fixture loading, API input) so nothing downstream handles raw JSON.
//!
//! ```json
//! { "kind": "NUMBER", "min": 0, "max": 100, "unit": "%" }
//! { "kind": "RATING", "max": 5 }
//! { "kind": "SELECT", "options": ["Yes", "Partly", "No"] }
//! { "kind": "BOOLEAN" }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::IcmError;

/// Upper bound for a rating scale.
pub const MAX_RATING_SCALE: u8 = 10;

/// Shape of a checklist item's answer field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldConfig {
    /// Numeric measurement with optional bounds and unit.
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// Rating from 1 to `max`.
    Rating { max: u8 },
    /// One of a fixed list of options.
    Select { options: Vec<String> },
    /// Yes/no answer.
    Boolean,
}

/// A recorded answer to a checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldResponse {
    Number(f64),
    Rating(u8),
    Select(String),
    Boolean(bool),
}

impl FieldConfig {
    /// The `kind` tag, as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number { .. } => "NUMBER",
            Self::Rating { .. } => "RATING",
            Self::Select { .. } => "SELECT",
            Self::Boolean => "BOOLEAN",
        }
    }

    /// Check that the configuration itself is coherent.
    pub fn validate(&self) -> Result<(), IcmError> {
        match self {
            Self::Number { min, max, .. } => {
                for bound in [min, max].into_iter().flatten() {
                    if !bound.is_finite() {
                        return Err(IcmError::InvalidFieldConfig(format!(
                            "NUMBER bound must be finite, got {bound}"
                        )));
                    }
                }
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(IcmError::InvalidFieldConfig(format!(
                            "NUMBER min {lo} exceeds max {hi}"
                        )));
                    }
                }
                Ok(())
            }
            Self::Rating { max } => {
                if *max == 0 || *max > MAX_RATING_SCALE {
                    return Err(IcmError::InvalidFieldConfig(format!(
                        "RATING max must be within 1..={MAX_RATING_SCALE}, got {max}"
                    )));
                }
                Ok(())
            }
            Self::Select { options } => {
                if options.is_empty() {
                    return Err(IcmError::InvalidFieldConfig(
                        "SELECT requires at least one option".to_string(),
                    ));
                }
                let mut seen = HashSet::new();
                for option in options {
                    if option.trim().is_empty() {
                        return Err(IcmError::InvalidFieldConfig(
                            "SELECT options must not be blank".to_string(),
                        ));
                    }
                    if !seen.insert(option.as_str()) {
                        return Err(IcmError::InvalidFieldConfig(format!(
                            "SELECT option {option:?} is duplicated"
                        )));
                    }
                }
                Ok(())
            }
            Self::Boolean => Ok(()),
        }
    }

    /// Check a recorded response against this configuration.
    pub fn validate_response(&self, response: &FieldResponse) -> Result<(), IcmError> {
        match (self, response) {
            (Self::Number { min, max, .. }, FieldResponse::Number(value)) => {
                if !value.is_finite() {
                    return Err(IcmError::InvalidResponse(format!(
                        "NUMBER response must be finite, got {value}"
                    )));
                }
                if min.is_some_and(|lo| *value < lo) || max.is_some_and(|hi| *value > hi) {
                    return Err(IcmError::InvalidResponse(format!(
                        "NUMBER response {value} outside configured bounds"
                    )));
                }
                Ok(())
            }
            (Self::Rating { max }, FieldResponse::Rating(value)) => {
                if *value == 0 || value > max {
                    return Err(IcmError::InvalidResponse(format!(
                        "RATING response must be within 1..={max}, got {value}"
                    )));
                }
                Ok(())
            }
            (Self::Select { options }, FieldResponse::Select(choice)) => {
                if !options.iter().any(|o| o == choice) {
                    return Err(IcmError::InvalidResponse(format!(
                        "SELECT response {choice:?} is not one of the options"
                    )));
                }
                Ok(())
            }
            (Self::Boolean, FieldResponse::Boolean(_)) => Ok(()),
            (config, response) => Err(IcmError::InvalidResponse(format!(
                "{} response does not match {} field",
                response.kind(),
                config.kind()
            ))),
        }
    }
}

impl FieldResponse {
    /// The `kind` tag, as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::Rating(_) => "RATING",
            Self::Select(_) => "SELECT",
            Self::Boolean(_) => "BOOLEAN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_deserialize_from_tagged_json() {
        let number: FieldConfig =
            serde_json::from_str(r#"{"kind":"NUMBER","min":0,"max":100,"unit":"%"}"#).unwrap();
        assert_eq!(
            number,
            FieldConfig::Number {
                min: Some(0.0),
                max: Some(100.0),
                unit: Some("%".to_string())
            }
        );
        let boolean: FieldConfig = serde_json::from_str(r#"{"kind":"BOOLEAN"}"#).unwrap();
        assert_eq!(boolean, FieldConfig::Boolean);
        assert!(serde_json::from_str::<FieldConfig>(r#"{"kind":"TEXT"}"#).is_err());
    }

    #[test]
    fn incoherent_configs_are_rejected() {
        let inverted = FieldConfig::Number {
            min: Some(10.0),
            max: Some(1.0),
            unit: None,
        };
        assert!(inverted.validate().is_err());
        assert!(FieldConfig::Rating { max: 0 }.validate().is_err());
        assert!(FieldConfig::Rating { max: 11 }.validate().is_err());
        assert!(FieldConfig::Select { options: vec![] }.validate().is_err());
        assert!(FieldConfig::Select {
            options: vec!["Yes".into(), "Yes".into()]
        }
        .validate()
        .is_err());
        assert!(FieldConfig::Rating { max: 5 }.validate().is_ok());
    }

    #[test]
    fn responses_are_checked_against_config() {
        let pct = FieldConfig::Number {
            min: Some(0.0),
            max: Some(100.0),
            unit: None,
        };
        assert!(pct.validate_response(&FieldResponse::Number(42.0)).is_ok());
        assert!(pct.validate_response(&FieldResponse::Number(101.0)).is_err());

        let rating = FieldConfig::Rating { max: 5 };
        assert!(rating.validate_response(&FieldResponse::Rating(5)).is_ok());
        assert!(rating.validate_response(&FieldResponse::Rating(0)).is_err());

        let select = FieldConfig::Select {
            options: vec!["Yes".into(), "No".into()],
        };
        assert!(select
            .validate_response(&FieldResponse::Select("No".into()))
            .is_ok());
        assert!(select
            .validate_response(&FieldResponse::Select("Maybe".into()))
            .is_err());
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let err = FieldConfig::Boolean
            .validate_response(&FieldResponse::Rating(3))
            .unwrap_err();
        assert_eq!(
            err,
            IcmError::InvalidResponse("RATING response does not match BOOLEAN field".into())
        );
    }

    #[test]
    fn response_wire_format() {
        let json = serde_json::to_string(&FieldResponse::Boolean(true)).unwrap();
        assert_eq!(json, r#"{"kind":"BOOLEAN","value":true}"#);
    }
}
