//! Header canonicalization.
//!
//! Each uploaded header is normalized (see [`normalize_header`]) and looked up
//! first among the canonical names, then in the synonym table. The first
//! upload column that resolves to a feature supplies it; later columns that
//! resolve to the same feature are reported and ignored.

use std::collections::BTreeMap;

use chd_model::{
    DERIVATION_SOURCES, ReconciliationConfig, ReconciliationReport, normalize_header,
};
use polars::prelude::{DataFrame, PolarsResult};
use rapidfuzz::distance::jaro_winkler;
use tracing::debug;

use crate::engine::record_warning;
use crate::staging::StagingFrame;

/// Minimum Jaro-Winkler similarity for a dropped header to get a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Where each upload column goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPlan {
    /// `(canonical feature, source header)` in upload order.
    pub mapped: Vec<(String, String)>,
    /// `(passthrough name, source header)` in upload order.
    pub passthrough: Vec<(String, String)>,
    /// Source headers with no canonical mapping.
    pub unmapped: Vec<String>,
}

impl HeaderPlan {
    pub fn source_for(&self, canonical: &str) -> Option<&str> {
        self.mapped
            .iter()
            .find(|(name, _)| name == canonical)
            .map(|(_, source)| source.as_str())
    }

    /// First unmapped header whose normalized form is one of `aliases`.
    pub fn find_unmapped(&self, aliases: &[&str]) -> Option<&str> {
        self.unmapped
            .iter()
            .find(|header| aliases.contains(&normalize_header(header).as_str()))
            .map(String::as_str)
    }
}

/// Maps upload headers onto canonical features and records the outcome in `report`.
///
/// Fills `mapping_summary`, `extras_dropped`, `duplicates_ignored` and
/// `suggestions`. Passthrough identifiers are neither mapped nor dropped.
pub fn plan_headers(
    headers: &[String],
    config: &ReconciliationConfig,
    report: &mut ReconciliationReport,
) -> HeaderPlan {
    let mut plan = HeaderPlan::default();
    for header in headers {
        if let Some(canonical) = config.resolve_header(header) {
            if let Some(first) = plan.source_for(canonical) {
                let message =
                    format!("Ignored column '{header}': '{canonical}' already mapped from '{first}'");
                report.duplicates_ignored.push(header.clone());
                record_warning(report, message);
                continue;
            }
            report
                .mapping_summary
                .insert(canonical.to_string(), header.clone());
            plan.mapped.push((canonical.to_string(), header.clone()));
            continue;
        }

        let normalized = normalize_header(header);
        if let Some(name) = config
            .passthrough()
            .iter()
            .find(|name| **name == normalized)
            && !plan.passthrough.iter().any(|(existing, _)| existing == name)
        {
            plan.passthrough.push((name.clone(), header.clone()));
            continue;
        }

        if !is_derivation_source(&normalized)
            && let Some(target) = suggest_feature(&normalized, config)
        {
            report.suggestions.insert(header.clone(), target);
        }
        report.extras_dropped.push(header.clone());
        plan.unmapped.push(header.clone());
    }
    debug!(
        mapped = plan.mapped.len(),
        passthrough = plan.passthrough.len(),
        dropped = plan.unmapped.len(),
        "canonicalized headers"
    );
    plan
}

fn is_derivation_source(normalized: &str) -> bool {
    DERIVATION_SOURCES
        .iter()
        .any(|(_, aliases)| aliases.contains(&normalized))
}

/// Closest canonical feature for a normalized header, compared against
/// canonical names and their synonyms.
pub fn suggest_feature(normalized: &str, config: &ReconciliationConfig) -> Option<String> {
    let mut candidates: BTreeMap<String, &str> = config
        .schema()
        .names()
        .map(|name| (normalize_header(name), name))
        .collect();
    for (alias, target) in config.synonyms().iter() {
        candidates.insert(alias.to_string(), target);
    }

    let mut best: Option<(f64, &str)> = None;
    for (candidate, target) in &candidates {
        let score = jaro_winkler::similarity(normalized.chars(), candidate.chars());
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, target));
        }
    }
    best.map(|(_, target)| target.to_string())
}

/// Copies mapped and passthrough columns out of the upload under their target names.
pub(crate) fn stage_columns(raw: &DataFrame, plan: &HeaderPlan) -> PolarsResult<StagingFrame> {
    let mut staging = StagingFrame::new(raw.height());
    for (target, source) in plan.mapped.iter().chain(plan.passthrough.iter()) {
        let mut column = raw.column(source)?.clone();
        column.rename(target.as_str().into());
        staging.insert(column);
    }
    Ok(staging)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn maps_canonical_and_synonym_headers() {
        let config = ReconciliationConfig::framingham();
        let mut report = ReconciliationReport::new();
        let plan = plan_headers(
            &headers(&[" Sex ", "SYSBP", "Total Cholesterol", "notes", "ID"]),
            &config,
            &mut report,
        );

        assert_eq!(plan.source_for("gender"), Some(" Sex "));
        assert_eq!(plan.source_for("sysBP"), Some("SYSBP"));
        assert_eq!(plan.source_for("totChol"), Some("Total Cholesterol"));
        assert_eq!(plan.passthrough, vec![("id".to_string(), "ID".to_string())]);
        assert_eq!(report.extras_dropped, vec!["notes"]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn later_duplicate_is_ignored_with_warning() {
        let config = ReconciliationConfig::framingham();
        let mut report = ReconciliationReport::new();
        let plan = plan_headers(&headers(&["sex", "gender"]), &config, &mut report);

        assert_eq!(plan.source_for("gender"), Some("sex"));
        assert_eq!(report.duplicates_ignored, vec!["gender"]);
        assert_eq!(
            report.warnings,
            vec!["Ignored column 'gender': 'gender' already mapped from 'sex'"]
        );
        assert!(report.extras_dropped.is_empty());
    }

    #[test]
    fn near_miss_gets_suggestion() {
        let config = ReconciliationConfig::framingham();
        assert_eq!(
            suggest_feature("glucos", &config),
            Some("glucose".to_string())
        );
        assert_eq!(suggest_feature("notes", &config), None);
    }

    #[test]
    fn derivation_sources_are_dropped_without_suggestion() {
        let config = ReconciliationConfig::framingham();
        let mut report = ReconciliationReport::new();
        let plan = plan_headers(&headers(&["Date of Birth"]), &config, &mut report);

        assert_eq!(plan.find_unmapped(&["dob", "date_of_birth"]), Some("Date of Birth"));
        assert_eq!(report.extras_dropped, vec!["Date of Birth"]);
        assert!(report.suggestions.is_empty());
    }
}
