//! Splits oversized analyses along cost-division boundaries.

use serde_json::Map;

use super::analysis_result::{estimate_tokens, AnalysisResult};

/// Partitions an analysis into chunks small enough for one LLM call.
///
/// A division is never split and never repeated; division order is kept
/// within and across chunks; every non-division field is copied into each
/// chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionChunker {
    max_tokens: usize,
}

impl DivisionChunker {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// An analysis under the budget comes back as the only chunk.
    /// Otherwise divisions are grouped `max(1, N/3)` at a time.
    pub fn chunk(&self, analysis: &AnalysisResult) -> Vec<AnalysisResult> {
        let tokens = estimate_tokens(&analysis.to_json());
        let divisions = analysis.division_count();

        if tokens < self.max_tokens || divisions == 0 {
            return vec![analysis.clone()];
        }

        let group_size = (divisions / 3).max(1);
        let entries: Vec<_> = analysis.csi_divisions.iter().collect();

        let chunks: Vec<AnalysisResult> = entries
            .chunks(group_size)
            .map(|group| {
                let divisions: Map<_, _> = group
                    .iter()
                    .map(|(key, value)| ((*key).clone(), (*value).clone()))
                    .collect();
                analysis.with_divisions(divisions)
            })
            .collect();

        tracing::debug!(
            tokens,
            budget = self.max_tokens,
            divisions,
            chunks = chunks.len(),
            "Split analysis into division chunks"
        );
        chunks
    }
}
