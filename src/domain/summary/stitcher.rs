//! Multi-pass summary generation.
//!
//! An analysis is chunked along its divisions, each chunk is summarized by
//! its own LLM call, and the pieces are merged by one more call. Every reply
//! is sanitized to markdown and the final document is hard-capped.

use futures::future::join_all;
use std::sync::Arc;

use super::cap::hard_cap;
use super::prompts;
use super::sanitize::sanitize_markdown;
use crate::domain::analysis::{AnalysisResult, DivisionChunker};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Separator used when pieces are joined without a merge call.
pub const PIECE_SEPARATOR: &str = "\n\n---\n\n";

const MIN_REPLY_TOKENS: u32 = 256;
const MAX_REPLY_TOKENS: u32 = 8192;

/// A finished summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutput {
    pub markdown: String,
    /// Length of `markdown` in characters.
    pub chars: usize,
    /// Markdown heading lines in the result.
    pub sections_emitted: usize,
    /// Chunks the analysis was split into.
    pub chunks: usize,
}

impl SummaryOutput {
    fn new(markdown: String, chunks: usize) -> Self {
        let sections_emitted = markdown
            .lines()
            .filter(|line| line.trim_start().starts_with('#'))
            .count();
        Self {
            chars: markdown.chars().count(),
            sections_emitted,
            chunks,
            markdown,
        }
    }
}

/// Produces capped markdown summaries of bid analyses.
#[derive(Clone)]
pub struct SummaryStitcher {
    provider: Option<Arc<dyn AIProvider>>,
    chunker: DivisionChunker,
    temperature: f32,
}

impl SummaryStitcher {
    /// `provider` is `None` when no LLM credential is configured; merges then
    /// fall back to joining pieces.
    pub fn new(provider: Option<Arc<dyn AIProvider>>, chunker: DivisionChunker) -> Self {
        Self {
            provider,
            chunker,
            temperature: 0.3,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Summarizes `analysis` into at most `max_chars` characters plus the
    /// truncation marker.
    ///
    /// Chunk calls run concurrently; their pieces keep chunk order. A chunk
    /// whose call fails contributes nothing.
    pub async fn summarize(
        &self,
        analysis: &AnalysisResult,
        sections: &[String],
        max_chars: usize,
        metadata: &RequestMetadata,
    ) -> SummaryOutput {
        let chunks = self.chunker.chunk(analysis);
        let parts = chunks.len();
        let piece_budget = max_chars / 3;

        let calls = chunks.iter().enumerate().map(|(i, chunk)| {
            self.summarize_chunk(chunk, i + 1, parts, sections, piece_budget, metadata)
        });
        let pieces: Vec<String> = join_all(calls)
            .await
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .collect();

        tracing::info!(
            trace_id = %metadata.trace_id,
            chunks = parts,
            pieces = pieces.len(),
            max_chars,
            "Chunk summaries generated"
        );

        let stitched = self.stitch(pieces, sections, max_chars, metadata).await;
        SummaryOutput::new(hard_cap(&stitched, max_chars), parts)
    }

    /// Merges pieces into one document.
    ///
    /// No pieces gives an empty string and one piece comes back unchanged.
    /// Several pieces go through one merge call; if that call fails, returns
    /// nothing usable, or no provider is configured, the pieces are joined
    /// with [`PIECE_SEPARATOR`].
    pub async fn stitch(
        &self,
        pieces: Vec<String>,
        sections: &[String],
        max_chars: usize,
        metadata: &RequestMetadata,
    ) -> String {
        match pieces.len() {
            0 => return String::new(),
            1 => return pieces.into_iter().next().unwrap_or_default(),
            _ => {}
        }

        let Some(provider) = &self.provider else {
            return pieces.join(PIECE_SEPARATOR);
        };

        let request = CompletionRequest::new(metadata.clone())
            .with_system_prompt(prompts::merge_system_prompt(sections, max_chars))
            .with_message(MessageRole::User, prompts::merge_user_prompt(&pieces))
            .with_max_tokens(reply_tokens(max_chars))
            .with_temperature(self.temperature);

        match provider.complete(request).await {
            Ok(response) => {
                let merged = sanitize_markdown(&response.content);
                if merged.is_empty() {
                    tracing::warn!(trace_id = %metadata.trace_id, "Merge reply had no markdown, joining pieces");
                    pieces.join(PIECE_SEPARATOR)
                } else {
                    merged
                }
            }
            Err(e) => {
                tracing::warn!(trace_id = %metadata.trace_id, error = %e, "Merge call failed, joining pieces");
                pieces.join(PIECE_SEPARATOR)
            }
        }
    }

    async fn summarize_chunk(
        &self,
        chunk: &AnalysisResult,
        part: usize,
        parts: usize,
        sections: &[String],
        budget: usize,
        metadata: &RequestMetadata,
    ) -> String {
        let Some(provider) = &self.provider else {
            return String::new();
        };

        let request = CompletionRequest::new(metadata.clone())
            .with_system_prompt(prompts::chunk_system_prompt(sections, budget, part, parts))
            .with_message(MessageRole::User, prompts::chunk_user_prompt(&chunk.to_json()))
            .with_max_tokens(reply_tokens(budget))
            .with_temperature(self.temperature);

        match provider.complete(request).await {
            Ok(response) => sanitize_markdown(&response.content),
            Err(e) => {
                tracing::warn!(
                    trace_id = %metadata.trace_id,
                    part,
                    parts,
                    error = %e,
                    "Chunk summary failed, skipping"
                );
                String::new()
            }
        }
    }
}

/// Reply token allowance for a character budget.
fn reply_tokens(budget_chars: usize) -> u32 {
    let tokens = u32::try_from(budget_chars / 3).unwrap_or(MAX_REPLY_TOKENS);
    tokens.clamp(MIN_REPLY_TOKENS, MAX_REPLY_TOKENS)
}
