use axum::{routing::get, Router};

use super::handlers::get_flags;
use crate::adapters::http::state::AppState;

/// Mounted at `/api/flags`.
pub fn flag_routes() -> Router<AppState> {
    Router::new().route("/", get(get_flags))
}
