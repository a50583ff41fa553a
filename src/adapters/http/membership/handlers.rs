//! HTTP handlers for tier changes.

use axum::body::Bytes;
use axum::extract::{rejection::JsonRejection, Json, State};
use axum::http::{HeaderMap, StatusCode};

use super::dto::{SetTierRequest, WebhookResponse};
use crate::adapters::http::error::{ApiError, ApiErrorKind};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    ApplyBillingEventCommand, ApplyBillingEventResult, SetUserTierCommand,
};
use crate::domain::foundation::UserId;
use crate::domain::membership::WebhookError;

/// Header carrying `t=<unix secs>,v1=<hex hmac>`.
pub const SIGNATURE_HEADER: &str = "billing-signature";

/// POST /api/webhooks/billing
///
/// 2xx acknowledges the event, 4xx stops redelivery, 5xx asks for a retry.
pub async fn handle_billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            state.fail(WebhookError::ParseError(format!("missing {} header", SIGNATURE_HEADER)))
        })?;

    let cmd = ApplyBillingEventCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    let outcome = match state.billing_handler().handle(cmd).await {
        Ok(ApplyBillingEventResult::TierUpdated { .. }) => "updated",
        Ok(ApplyBillingEventResult::Ignored { .. }) => "ignored",
        Err(e) => {
            tracing::warn!(error = %e, retryable = e.is_retryable(), "Billing webhook rejected");
            return Err(state.fail(e));
        }
    };

    Ok(Json(WebhookResponse {
        received: true,
        outcome,
    }))
}

/// PUT /api/admin/tier
pub async fn set_tier(
    State(state): State<AppState>,
    body: Result<Json<SetTierRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = body.map_err(|e| state.fail(e))?;

    let user_id = UserId::new(&request.user_id)
        .map_err(|e| state.fail(ApiErrorKind::BadRequest(e.to_string())))?;

    state
        .set_tier_handler()
        .handle(SetUserTierCommand {
            user_id,
            tier: request.tier,
        })
        .await
        .map_err(|e| state.fail(e))?;

    Ok(StatusCode::NO_CONTENT)
}
