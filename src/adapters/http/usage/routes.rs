use axum::{routing::get, Router};

use super::handlers::{get_usage, reset_usage};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/usage`, development only.
pub fn usage_routes() -> Router<AppState> {
    Router::new().route("/", get(get_usage).delete(reset_usage))
}
