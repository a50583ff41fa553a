//! Axum routes for the LLM-backed endpoints.

use axum::{routing::post, Router};

use super::handlers::{analyze, summarize};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/claude`.
pub fn claude_routes() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/analyze", post(analyze))
}
