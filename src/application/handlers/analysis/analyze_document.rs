//! AnalyzeDocumentHandler - Command handler for extracting a structured bid
//! analysis from document text.
//!
//! The extraction call must come back as a JSON object with `csi_divisions`;
//! anything else is refused rather than passed through. A successful analysis
//! counts against the caller's monthly quota.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::analysis::{
    extraction_user_prompt, AnalysisResult, ParsedAnalysis, EXTRACTION_SYSTEM_PROMPT,
};
use crate::domain::foundation::UserId;
use crate::domain::membership::Tier;
use crate::domain::usage::{UsageLedger, UsageStatus};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata};

const EXTRACTION_MAX_TOKENS: u32 = 8_192;
const EXTRACTION_TEMPERATURE: f32 = 0.0;

/// Command to analyze one bid document.
#[derive(Debug, Clone)]
pub struct AnalyzeDocumentCommand {
    /// Signed-in caller; anonymous analyses are not counted.
    pub user_id: Option<UserId>,
    /// Tier the gate resolved for the caller.
    pub tier: Option<Tier>,
    pub document_text: String,
    pub file_name: Option<String>,
    pub metadata: RequestMetadata,
}

/// Result of a successful analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeDocumentResult {
    pub analysis: AnalysisResult,
    /// Usage after this analysis was recorded; `None` for anonymous callers.
    pub usage: Option<UsageStatus>,
}

#[derive(Debug, Error)]
pub enum AnalyzeDocumentError {
    #[error("No AI provider is configured")]
    ProviderNotConfigured,

    #[error("Document text is empty")]
    EmptyDocument,

    #[error("Extraction failed: {0}")]
    Upstream(#[from] AIError),

    #[error("Extraction reply was malformed: {0}")]
    Malformed(String),
}

/// Handler for analysis requests.
pub struct AnalyzeDocumentHandler {
    provider: Option<Arc<dyn AIProvider>>,
    usage: UsageLedger,
}

impl AnalyzeDocumentHandler {
    pub fn new(provider: Option<Arc<dyn AIProvider>>, usage: UsageLedger) -> Self {
        Self { provider, usage }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeDocumentCommand,
    ) -> Result<AnalyzeDocumentResult, AnalyzeDocumentError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(AnalyzeDocumentError::ProviderNotConfigured)?;

        if cmd.document_text.trim().is_empty() {
            return Err(AnalyzeDocumentError::EmptyDocument);
        }

        let request = CompletionRequest::new(cmd.metadata.clone())
            .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                extraction_user_prompt(cmd.file_name.as_deref(), &cmd.document_text),
            )
            .with_max_tokens(EXTRACTION_MAX_TOKENS)
            .with_temperature(EXTRACTION_TEMPERATURE);
        tracing::debug!(
            trace_id = %cmd.metadata.trace_id,
            prompt_chars = request.prompt_chars(),
            "Requesting extraction"
        );

        let response = provider.complete(request).await.map_err(|e| {
            tracing::warn!(trace_id = %cmd.metadata.trace_id, error = %e, "Extraction call failed");
            e
        })?;
        if response.is_truncated() {
            tracing::warn!(trace_id = %cmd.metadata.trace_id, "Extraction reply hit the token limit");
        }

        let analysis = match ParsedAnalysis::from_reply(&response.content) {
            ParsedAnalysis::Parsed(analysis) => analysis,
            ParsedAnalysis::Malformed(reason) => {
                tracing::warn!(trace_id = %cmd.metadata.trace_id, reason = %reason, "Extraction reply rejected");
                return Err(AnalyzeDocumentError::Malformed(reason));
            }
        };

        // Only successful analyses count.
        let usage = match &cmd.user_id {
            Some(user_id) => {
                self.usage.increment(user_id).await;
                let tier = cmd.tier.unwrap_or_else(Tier::lowest);
                Some(self.usage.status(user_id, tier).await)
            }
            None => None,
        };

        tracing::info!(
            trace_id = %cmd.metadata.trace_id,
            divisions = analysis.division_count(),
            tokens = response.usage.total_tokens,
            "Bid document analyzed"
        );

        Ok(AnalyzeDocumentResult { analysis, usage })
    }
}
