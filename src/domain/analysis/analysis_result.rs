//! Structured bid analysis as produced by extraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An extracted bid analysis.
///
/// `csi_divisions` maps a cost-division key (e.g. `"03 - Concrete"`) to its
/// entry, in the order the divisions appeared. Every other top-level field
/// (contractor, totals, exclusions, ...) is kept verbatim in `rest`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub csi_divisions: Map<String, Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl AnalysisResult {
    pub fn division_count(&self) -> usize {
        self.csi_divisions.len()
    }

    pub fn division_keys(&self) -> impl Iterator<Item = &str> {
        self.csi_divisions.keys().map(String::as_str)
    }

    /// Serialized JSON. A map of JSON values always serializes.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Same non-division fields, different divisions.
    pub fn with_divisions(&self, csi_divisions: Map<String, Value>) -> Self {
        Self {
            csi_divisions,
            rest: self.rest.clone(),
        }
    }
}

/// Rough token count: one token per four bytes, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() + 3) / 4
}
