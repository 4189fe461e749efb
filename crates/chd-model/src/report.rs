use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every correction applied while reconciling one upload.
///
/// Built fresh per call and append-only while the call runs. The first four
/// fields are serialized verbatim into prediction responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Canonical feature -> original header it was read from.
    pub mapping_summary: BTreeMap<String, String>,
    /// Uploaded headers with no canonical mapping.
    pub extras_dropped: Vec<String>,
    /// Canonical features absent from the upload, filled with nulls.
    pub missing_inserted: Vec<String>,
    /// Human-readable correction notices, in the order they were applied.
    pub warnings: Vec<String>,
    /// Headers ignored because an earlier header already supplied the same feature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates_ignored: Vec<String>,
    /// Dropped header -> closest canonical feature by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suggestions: BTreeMap<String, String>,
}

impl ReconciliationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Original header a canonical feature was read from.
    pub fn source_of(&self, canonical: &str) -> Option<&str> {
        self.mapping_summary.get(canonical).map(String::as_str)
    }

    /// True when nothing had to be dropped, inserted or corrected.
    pub fn is_clean(&self) -> bool {
        self.extras_dropped.is_empty()
            && self.missing_inserted.is_empty()
            && self.warnings.is_empty()
            && self.duplicates_ignored.is_empty()
    }
}
