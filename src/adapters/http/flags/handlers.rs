use axum::extract::{Json, State};

use super::dto::FlagsResponse;
use crate::adapters::http::middleware::RequestContext;
use crate::adapters::http::state::AppState;
use crate::domain::gate::TierStanding;

/// GET /api/flags
///
/// Never refuses: clients use the answer to decide what to show, including
/// the sign-in prompt when `auth` is on.
pub async fn get_flags(State(state): State<AppState>, context: RequestContext) -> Json<FlagsResponse> {
    let standing = match context.user_id() {
        Some(user_id) => Some(state.gate.standing_of(user_id).await),
        None => None,
    };

    let flags = state
        .gate
        .resolve_flags(standing.as_ref(), context.overrides.as_ref());

    Json(FlagsResponse {
        tier: standing.as_ref().and_then(TierStanding::preset_tier),
        enabled: flags.enabled(),
        flags,
        overridden: context.overrides.is_some(),
    })
}
