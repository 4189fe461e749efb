//! Single-patient prediction input.

use chd_model::{FEMALE, MALE, NO, YES};
use chd_reconcile::values::{normalize_flag, normalize_sex};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::row::FeatureRow;

/// Accepted range per numeric field. Out-of-range input is rejected, not clamped.
pub const PATIENT_LIMITS: [(&str, f64, f64); 8] = [
    ("age", 18.0, 120.0),
    ("sysBP", 70.0, 300.0),
    ("pulsePressure", 10.0, 200.0),
    ("BMI", 10.0, 60.0),
    ("heartRate", 30.0, 220.0),
    ("totChol", 100.0, 600.0),
    ("glucose", 50.0, 500.0),
    ("cigsPerDay", 0.0, 100.0),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientInput {
    pub age: f64,
    pub gender: String,
    #[serde(rename = "sysBP")]
    pub sys_bp: f64,
    #[serde(rename = "pulsePressure", default)]
    pub pulse_pressure: Option<f64>,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "heartRate", default)]
    pub heart_rate: Option<f64>,
    #[serde(rename = "totChol", default)]
    pub tot_chol: Option<f64>,
    #[serde(default)]
    pub glucose: Option<f64>,
    #[serde(rename = "cigsPerDay", default)]
    pub cigs_per_day: Option<f64>,
    #[serde(rename = "currentSmoker", default)]
    pub current_smoker: Option<String>,
    #[serde(rename = "BPMeds", default)]
    pub bp_meds: Option<String>,
    #[serde(rename = "prevalentStroke", default)]
    pub prevalent_stroke: Option<String>,
    #[serde(rename = "prevalentHyp", default)]
    pub prevalent_hyp: Option<String>,
    #[serde(default)]
    pub diabetes: Option<String>,
}

impl PatientInput {
    fn numbers(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("age", Some(self.age)),
            ("sysBP", Some(self.sys_bp)),
            ("pulsePressure", self.pulse_pressure),
            ("BMI", Some(self.bmi)),
            ("heartRate", self.heart_rate),
            ("totChol", self.tot_chol),
            ("glucose", self.glucose),
            ("cigsPerDay", self.cigs_per_day),
        ]
    }

    fn flags(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("currentSmoker", self.current_smoker.as_deref()),
            ("BPMeds", self.bp_meds.as_deref()),
            ("prevalentStroke", self.prevalent_stroke.as_deref()),
            ("prevalentHyp", self.prevalent_hyp.as_deref()),
            ("diabetes", self.diabetes.as_deref()),
        ]
    }

    /// Checks field ranges and categorical levels.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.numbers() {
            let Some(value) = value else {
                continue;
            };
            let Some((_, low, high)) = PATIENT_LIMITS.iter().find(|(name, _, _)| *name == field)
            else {
                continue;
            };
            if !value.is_finite() || value < *low || value > *high {
                return Err(ScoreError::invalid_field(
                    field,
                    format!("{value} is outside [{low}, {high}]"),
                ));
            }
        }
        let sex = normalize_sex(&self.gender);
        if sex != MALE && sex != FEMALE {
            return Err(ScoreError::invalid_field(
                "gender",
                format!("expected {MALE} or {FEMALE}, got '{}'", self.gender),
            ));
        }
        for (field, value) in self.flags() {
            if let Some(value) = value {
                let flag = normalize_flag(value);
                if flag != YES && flag != NO {
                    return Err(ScoreError::invalid_field(
                        field,
                        format!("expected {YES} or {NO}, got '{value}'"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Validates and converts to model inputs with normalized levels.
    pub fn to_feature_row(&self) -> Result<FeatureRow> {
        self.validate()?;
        let mut row = FeatureRow::default();
        for (field, value) in self.numbers() {
            row.set_number(field, value);
        }
        row.set_level("gender", Some(normalize_sex(&self.gender)));
        for (field, value) in self.flags() {
            row.set_level(field, value.map(normalize_flag));
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientInput {
        serde_json::from_str(
            r#"{"age": 45, "gender": "Male", "sysBP": 130.0, "BMI": 25.5, "currentSmoker": "no"}"#,
        )
        .unwrap()
    }

    #[test]
    fn optional_fields_default_to_missing() {
        let row = patient().to_feature_row().unwrap();
        assert_eq!(row.number("age"), Some(45.0));
        assert_eq!(row.number("glucose"), None);
        assert_eq!(row.level("gender"), Some("Male"));
        assert_eq!(row.level("currentSmoker"), Some("No"));
        assert_eq!(row.level("diabetes"), None);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut input = patient();
        input.age = 17.0;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ScoreError::InvalidField { ref field, .. } if field == "age"));

        let mut input = patient();
        input.tot_chol = Some(50.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn unknown_levels_are_rejected() {
        let mut input = patient();
        input.gender = "unknown".to_string();
        assert!(input.validate().is_err());

        let mut input = patient();
        input.diabetes = Some("sometimes".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let parsed: std::result::Result<PatientInput, _> =
            serde_json::from_str(r#"{"age": 45, "gender": "Male"}"#);
        assert!(parsed.is_err());
    }
}
