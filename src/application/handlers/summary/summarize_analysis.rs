//! SummarizeAnalysisHandler - Command handler for turning a bid analysis into
//! a bounded markdown report.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::SummaryConfig;
use crate::domain::analysis::{AnalysisResult, DivisionChunker};
use crate::domain::summary::{default_sections, SummaryOutput, SummaryStitcher};
use crate::ports::{AIProvider, RequestMetadata};

/// Accepted range and default for `max_chars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub default_max_chars: usize,
    pub min_max_chars: usize,
    pub max_max_chars: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            default_max_chars: 8_000,
            min_max_chars: 500,
            max_max_chars: 50_000,
        }
    }
}

impl From<&SummaryConfig> for SummaryLimits {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            default_max_chars: config.default_max_chars,
            min_max_chars: config.min_max_chars,
            max_max_chars: config.max_max_chars,
        }
    }
}

/// Command to summarize an analysis.
#[derive(Debug, Clone)]
pub struct SummarizeAnalysisCommand {
    pub analysis: AnalysisResult,
    /// Section ids to emit; `None` or empty means the default set.
    pub sections: Option<Vec<String>>,
    pub max_chars: Option<usize>,
    pub metadata: RequestMetadata,
}

/// Result of a summary run.
#[derive(Debug, Clone)]
pub struct SummarizeAnalysisResult {
    pub output: SummaryOutput,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeAnalysisError {
    #[error("No AI provider is configured")]
    ProviderNotConfigured,

    #[error("max_chars must be between {min} and {max}, got {value}")]
    MaxCharsOutOfRange { value: usize, min: usize, max: usize },
}

/// Handler for summary requests.
pub struct SummarizeAnalysisHandler {
    stitcher: SummaryStitcher,
    limits: SummaryLimits,
}

impl SummarizeAnalysisHandler {
    pub fn new(
        provider: Option<Arc<dyn AIProvider>>,
        chunker: DivisionChunker,
        limits: SummaryLimits,
    ) -> Self {
        Self {
            stitcher: SummaryStitcher::new(provider, chunker),
            limits,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.stitcher = self.stitcher.with_temperature(temperature);
        self
    }

    pub async fn handle(
        &self,
        cmd: SummarizeAnalysisCommand,
    ) -> Result<SummarizeAnalysisResult, SummarizeAnalysisError> {
        if !self.stitcher.has_provider() {
            return Err(SummarizeAnalysisError::ProviderNotConfigured);
        }

        let max_chars = self.max_chars(cmd.max_chars)?;

        let sections = match cmd.sections {
            Some(sections) if !sections.is_empty() => sections,
            _ => default_sections(),
        };

        let started = Instant::now();
        let output = self
            .stitcher
            .summarize(&cmd.analysis, &sections, max_chars, &cmd.metadata)
            .await;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            trace_id = %cmd.metadata.trace_id,
            chars = output.chars,
            sections_emitted = output.sections_emitted,
            chunks = output.chunks,
            processing_time_ms,
            "Summary generated"
        );

        Ok(SummarizeAnalysisResult {
            output,
            processing_time_ms,
        })
    }

    fn max_chars(&self, requested: Option<usize>) -> Result<usize, SummarizeAnalysisError> {
        let value = requested.unwrap_or(self.limits.default_max_chars);
        if value < self.limits.min_max_chars || value > self.limits.max_max_chars {
            return Err(SummarizeAnalysisError::MaxCharsOutOfRange {
                value,
                min: self.limits.min_max_chars,
                max: self.limits.max_max_chars,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::foundation::TraceId;
    use crate::domain::summary::TRUNCATION_MARKER;
    use serde_json::json;

    fn analysis() -> AnalysisResult {
        serde_json::from_value(json!({
            "contractor": "Acme Builders",
            "csi_divisions": {
                "03 - Concrete": {"subtotal": 120000},
                "05 - Metals": {"subtotal": 45000}
            }
        }))
        .unwrap()
    }

    fn command(max_chars: Option<usize>) -> SummarizeAnalysisCommand {
        SummarizeAnalysisCommand {
            analysis: analysis(),
            sections: None,
            max_chars,
            metadata: RequestMetadata::new(None, TraceId::new()),
        }
    }

    fn handler(provider: Arc<MockAIProvider>) -> SummarizeAnalysisHandler {
        SummarizeAnalysisHandler::new(
            Some(provider),
            DivisionChunker::new(12_000),
            SummaryLimits::default(),
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn without_provider_is_not_configured() {
        let handler = SummarizeAnalysisHandler::new(
            None,
            DivisionChunker::new(12_000),
            SummaryLimits::default(),
        );

        let result = handler.handle(command(None)).await;

        assert_eq!(result.unwrap_err(), SummarizeAnalysisError::ProviderNotConfigured);
    }

    #[tokio::test]
    async fn max_chars_outside_range_is_rejected() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = handler(provider.clone());

        for value in [499, 50_001] {
            let result = handler.handle(command(Some(value))).await;
            assert!(matches!(
                result,
                Err(SummarizeAnalysisError::MaxCharsOutOfRange { value: v, .. }) if v == value
            ));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn analysis_without_divisions_is_summarized_as_one_chunk() {
        let provider = Arc::new(MockAIProvider::new().with_response("## Overview\n\nNo line items."));
        let handler = handler(provider.clone());
        let mut cmd = command(None);
        cmd.analysis = AnalysisResult::default();

        let result = handler.handle(cmd).await.unwrap();

        assert_eq!(result.output.chunks, 1);
        assert_eq!(provider.call_count(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Summaries
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn single_chunk_returns_sanitized_piece() {
        let provider = Arc::new(
            MockAIProvider::new().with_response("## Overview\n\nTwo divisions.\n\n## Risks\n\nNone."),
        );
        let handler = handler(provider.clone());

        let result = handler.handle(command(None)).await.unwrap();

        assert_eq!(result.output.markdown, "## Overview\n\nTwo divisions.\n\n## Risks\n\nNone.");
        assert_eq!(result.output.sections_emitted, 2);
        assert_eq!(result.output.chunks, 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn default_sections_are_sent_when_none_requested() {
        let provider = Arc::new(MockAIProvider::new().with_response("## Overview\n\nok"));
        let handler = handler(provider.clone());
        let mut cmd = command(None);
        cmd.sections = Some(vec![]);

        handler.handle(cmd).await.unwrap();

        let system = provider.get_calls()[0].system_prompt.clone().unwrap();
        assert!(system.contains("Scope Gaps"));
        assert!(system.contains("Recommendations"));
    }

    #[tokio::test]
    async fn long_reply_is_capped() {
        let provider = Arc::new(MockAIProvider::new().with_response("word ".repeat(400)));
        let handler = handler(provider);

        let result = handler.handle(command(Some(500))).await.unwrap();

        assert!(result.output.markdown.ends_with(TRUNCATION_MARKER));
        assert!(result.output.markdown.chars().count() <= 500 + TRUNCATION_MARKER.chars().count());
    }
}
