//! Alternate header spellings mapped onto canonical features.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::schema::{CanonicalSchema, normalize_header};

const FRAMINGHAM_SYNONYMS: &[(&str, &str)] = &[
    ("sex", "gender"),
    ("gndr", "gender"),
    ("bp", "sysBP"),
    ("blood_pressure", "sysBP"),
    ("resting_bp", "sysBP"),
    ("systolic_bp", "sysBP"),
    ("sbp", "sysBP"),
    ("pulse_pressure", "pulsePressure"),
    ("pp", "pulsePressure"),
    ("bmi_kg_m2", "BMI"),
    ("chol", "totChol"),
    ("total_cholesterol", "totChol"),
    ("fbs", "glucose"),
    ("fasting_glucose", "glucose"),
    ("fpg", "glucose"),
    ("hr", "heartRate"),
    ("resting_hr", "heartRate"),
    ("cigarettes_per_day", "cigsPerDay"),
    ("cigs_per_day", "cigsPerDay"),
    ("smoker", "currentSmoker"),
    ("smoking_status", "currentSmoker"),
    ("current_smoker", "currentSmoker"),
    ("bpmeds", "BPMeds"),
    ("bp_meds", "BPMeds"),
    ("blood_pressure_meds", "BPMeds"),
    ("stroke", "prevalentStroke"),
    ("prev_stroke", "prevalentStroke"),
    ("hypertension", "prevalentHyp"),
    ("htn", "prevalentHyp"),
    ("dm", "diabetes"),
    ("t2d", "diabetes"),
    ("type2_diabetes", "diabetes"),
];

/// Normalized alias -> canonical feature name. Many-to-one.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    /// Builds a table whose every target is a member of `schema`.
    ///
    /// Aliases are stored normalized. Targets may be given in any header
    /// spelling of the canonical name and are stored in canonical form.
    pub fn new<I, A, T>(entries: I, schema: &CanonicalSchema) -> Result<Self>
    where
        I: IntoIterator<Item = (A, T)>,
        A: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table: BTreeMap<String, String> = BTreeMap::new();
        for (alias, target) in entries {
            let alias = normalize_header(alias.as_ref());
            let Some(canonical) = schema.resolve(&normalize_header(target.as_ref())) else {
                return Err(ModelError::UnknownFeature {
                    name: target.as_ref().to_string(),
                });
            };
            if let Some(shadowed) = schema.resolve(&alias)
                && shadowed != canonical
            {
                return Err(ModelError::ConflictingSynonym {
                    alias,
                    first: shadowed.to_string(),
                    second: canonical.to_string(),
                });
            }
            if let Some(existing) = table.get(&alias)
                && existing != canonical
            {
                return Err(ModelError::ConflictingSynonym {
                    alias,
                    first: existing.clone(),
                    second: canonical.to_string(),
                });
            }
            table.insert(alias, canonical.to_string());
        }
        Ok(Self { entries: table })
    }

    pub fn framingham() -> Self {
        let entries = FRAMINGHAM_SYNONYMS
            .iter()
            .map(|(alias, target)| (normalize_header(alias), (*target).to_string()))
            .collect();
        Self { entries }
    }

    /// Looks up an already-normalized header.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(String::as_str)
    }

    /// Aliases pointing at `canonical`, in alias order.
    pub fn aliases_for(&self, canonical: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framingham_targets_are_canonical() {
        let schema = CanonicalSchema::framingham();
        let table = SynonymTable::framingham();
        for (_, target) in table.iter() {
            assert!(schema.contains(target), "{target} is not canonical");
        }
    }

    #[test]
    fn framingham_passes_validation() {
        let schema = CanonicalSchema::framingham();
        let validated = SynonymTable::new(FRAMINGHAM_SYNONYMS.iter().copied(), &schema).unwrap();
        assert_eq!(validated.len(), SynonymTable::framingham().len());
    }

    #[test]
    fn new_normalizes_alias_and_target() {
        let schema = CanonicalSchema::framingham();
        let table = SynonymTable::new([("Systolic Pressure", "SYSBP")], &schema).unwrap();
        assert_eq!(table.get("systolic_pressure"), Some("sysBP"));
    }

    #[test]
    fn new_rejects_unknown_target() {
        let schema = CanonicalSchema::framingham();
        let err = SynonymTable::new([("ldl", "ldlChol")], &schema).unwrap_err();
        assert!(matches!(err, ModelError::UnknownFeature { name } if name == "ldlChol"));
    }

    #[test]
    fn new_rejects_alias_shadowing_other_feature() {
        let schema = CanonicalSchema::framingham();
        let err = SynonymTable::new([("age", "glucose")], &schema).unwrap_err();
        assert!(matches!(err, ModelError::ConflictingSynonym { .. }));
    }

    #[test]
    fn new_rejects_alias_reused_for_another_feature() {
        let schema = CanonicalSchema::framingham();
        let entries = [("pressure", "sysBP"), ("Pressure", "pulsePressure")];
        let err = SynonymTable::new(entries, &schema).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ConflictingSynonym { alias, first, second }
                if alias == "pressure" && first == "sysBP" && second == "pulsePressure"
        ));
        let table =
            SynonymTable::new([("pressure", "sysBP"), ("PRESSURE", "sysbp")], &schema).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn aliases_for_lists_all_spellings() {
        let table = SynonymTable::framingham();
        assert_eq!(table.aliases_for("gender"), vec!["gndr", "sex"]);
    }
}
