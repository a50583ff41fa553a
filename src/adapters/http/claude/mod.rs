//! HTTP adapter for the LLM-backed endpoints.
//!
//! - `POST /api/claude/summarize` - Markdown summary of an analysis (`aiSummary`)
//! - `POST /api/claude/analyze` - Extract a structured analysis (`bidAnalysis`, metered)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::claude_routes;
