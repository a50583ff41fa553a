//! Request and response bodies for the LLM-backed endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::AnalysisResult;
use crate::domain::usage::UsageStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    pub analysis: AnalysisResult,
    #[serde(default)]
    pub sections: Option<Vec<String>>,
    #[serde(default, alias = "maxChars")]
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(alias = "documentText")]
    pub document_text: String,
    #[serde(default, alias = "fileName")]
    pub file_name: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    pub markdown: String,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub chars: usize,
    pub sections_emitted: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
    /// Absent for anonymous callers.
    pub usage: Option<UsageStatus>,
}
