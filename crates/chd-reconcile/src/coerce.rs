//! Numeric coercion.

use chd_model::CanonicalSchema;
use tracing::debug;

use crate::staging::{StagingFrame, numeric_cells, numeric_column, text_cells};

/// Converts every staged numeric feature to nullable `Float64`.
///
/// Cells that do not parse as a finite number become null; this never fails.
pub(crate) fn coerce_numeric(staging: &mut StagingFrame, schema: &CanonicalSchema) {
    for feature in schema.numeric() {
        let Some(column) = staging.get(&feature.name) else {
            continue;
        };
        let values = numeric_cells(column);
        let present = text_cells(column).iter().flatten().count();
        let parsed = values.iter().flatten().count();
        if parsed < present {
            debug!(
                feature = %feature.name,
                unparseable = present - parsed,
                "non-numeric cells set to missing"
            );
        }
        staging.insert(numeric_column(&feature.name, values));
    }
}
