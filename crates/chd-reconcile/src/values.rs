//! Categorical value normalization.

use chd_model::{
    BINARY_FALSE, BINARY_TRUE, CanonicalSchema, FEMALE, FeatureKind, MALE, NO, YES,
};
use tracing::debug;

use crate::staging::{StagingFrame, text_cells, text_column};

/// Maps `male`/`m` and `female`/`f` (any case, surrounding whitespace ignored)
/// to `Male`/`Female`. Anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use chd_reconcile::values::normalize_sex;
///
/// assert_eq!(normalize_sex(" M "), "Male");
/// assert_eq!(normalize_sex("FEMALE"), "Female");
/// assert_eq!(normalize_sex("unknown"), "unknown");
/// ```
pub fn normalize_sex(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "male" | "m" => MALE.to_string(),
        "female" | "f" => FEMALE.to_string(),
        _ => raw.to_string(),
    }
}

/// Maps the yes/no token sets to `Yes`/`No`. Anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use chd_reconcile::values::normalize_flag;
///
/// assert_eq!(normalize_flag("Y"), "Yes");
/// assert_eq!(normalize_flag("false"), "No");
/// assert_eq!(normalize_flag("1"), "Yes");
/// assert_eq!(normalize_flag("maybe"), "maybe");
/// ```
pub fn normalize_flag(raw: &str) -> String {
    let token = raw.trim().to_lowercase();
    if BINARY_TRUE.contains(&token.as_str()) {
        return YES.to_string();
    }
    if BINARY_FALSE.contains(&token.as_str()) {
        return NO.to_string();
    }
    raw.to_string()
}

fn normalize_value(kind: FeatureKind, raw: &str) -> String {
    match kind {
        FeatureKind::Sex => normalize_sex(raw),
        FeatureKind::YesNo => normalize_flag(raw),
        FeatureKind::Numeric => raw.to_string(),
    }
}

/// Rewrites every present categorical feature as a string column of normalized levels.
///
/// Missing cells stay missing; non-string cells are rendered to text first.
pub(crate) fn normalize_categoricals(staging: &mut StagingFrame, schema: &CanonicalSchema) {
    for feature in schema.categorical() {
        let Some(column) = staging.get(&feature.name) else {
            continue;
        };
        let cells = text_cells(column);
        let mut unrecognized = 0usize;
        let normalized: Vec<Option<String>> = cells
            .into_iter()
            .map(|cell| {
                cell.map(|value| {
                    let level = normalize_value(feature.kind, &value);
                    if feature.kind.levels().is_some_and(|levels| !levels.contains(&level.as_str())) {
                        unrecognized += 1;
                    }
                    level
                })
            })
            .collect();
        debug!(feature = %feature.name, unrecognized, "normalized categorical values");
        staging.insert(text_column(&feature.name, normalized));
    }
}
