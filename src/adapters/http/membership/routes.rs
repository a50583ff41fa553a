//! Axum routes for tier changes.

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers::{handle_billing_webhook, set_tier};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/webhooks`. No user auth; requests are signature-verified.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/billing", post(handle_billing_webhook))
}

/// Mounted at `/api/admin`, development only.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/tier", put(set_tier))
}
