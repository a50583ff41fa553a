use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{GetUsageStatusQuery, ResetUsageCommand};

/// GET /api/usage
pub async fn get_usage(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> impl IntoResponse {
    let status = state
        .usage_status_handler()
        .handle(GetUsageStatusQuery {
            user_id: user.id,
            month: None,
        })
        .await;
    Json(status)
}

/// DELETE /api/usage
pub async fn reset_usage(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode, ApiError> {
    state
        .reset_usage_handler()
        .handle(ResetUsageCommand { user_id: user.id })
        .await
        .map_err(|e| state.fail(e))?;
    Ok(StatusCode::NO_CONTENT)
}
