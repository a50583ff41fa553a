//! HTTP handlers for the LLM-backed endpoints.
//!
//! Each handler runs the gate first; the application handler only sees
//! requests the gate let through.

use axum::extract::{rejection::JsonRejection, Json, State};
use axum::response::IntoResponse;

use super::dto::{AnalyzeRequest, AnalyzeResponse, SummarizeRequest, SummarizeResponse, SummaryStats};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequestContext;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{AnalyzeDocumentCommand, SummarizeAnalysisCommand};
use crate::domain::flags::Flag;
use crate::domain::gate::GateOptions;

/// POST /api/claude/summarize
pub async fn summarize(
    State(state): State<AppState>,
    context: RequestContext,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .check(&context.gate_request(), GateOptions::requiring(Flag::AiSummary))
        .await
        .map_err(|e| state.fail(e))?;

    let Json(request) = body.map_err(|e| state.fail(e))?;

    let cmd = SummarizeAnalysisCommand {
        analysis: request.analysis,
        sections: request.sections,
        max_chars: request.max_chars,
        metadata: context.metadata(),
    };

    let result = state
        .summarize_handler()
        .handle(cmd)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(SummarizeResponse {
        stats: SummaryStats {
            chars: result.output.chars,
            sections_emitted: result.output.sections_emitted,
            processing_time_ms: result.processing_time_ms,
        },
        markdown: result.output.markdown,
    }))
}

/// POST /api/claude/analyze
pub async fn analyze(
    State(state): State<AppState>,
    context: RequestContext,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let gate = state
        .gate
        .check(
            &context.gate_request(),
            GateOptions::requiring(Flag::BidAnalysis).metered(),
        )
        .await
        .map_err(|e| state.fail(e))?;

    let Json(request) = body.map_err(|e| state.fail(e))?;

    let cmd = AnalyzeDocumentCommand {
        user_id: gate.user_id,
        tier: gate.tier,
        document_text: request.document_text,
        file_name: request.file_name,
        metadata: context.metadata(),
    };

    let result = state
        .analyze_handler()
        .handle(cmd)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(AnalyzeResponse {
        analysis: result.analysis,
        usage: result.usage,
    }))
}
