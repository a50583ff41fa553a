//! The complete HTTP application: routes, middleware and tower layers.

use std::time::Duration;

use axum::{
    http::{header::HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::claude::claude_routes;
use super::flags::flag_routes;
use super::membership::{admin_routes, webhook_routes};
use super::middleware::{auth_middleware, override_middleware, AuthState, REQUEST_ID_HEADER};
use super::state::AppState;
use super::usage::usage_routes;
use crate::config::ServerConfig;

/// Builds the application router.
///
/// Development-only routes (`/api/usage`, `/api/admin`) are not mounted
/// outside development, so they answer 404 there. Without a session
/// validator every request is anonymous.
pub fn app_router(state: AppState, validator: Option<AuthState>, server: &ServerConfig) -> Router {
    let mut api = Router::new()
        .nest("/flags", flag_routes())
        .nest("/claude", claude_routes())
        .nest("/webhooks", webhook_routes());

    if server.is_development() {
        tracing::info!("Mounting development-only usage and admin routes");
        api = api.nest("/usage", usage_routes()).nest("/admin", admin_routes());
    }

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.resolver(),
            override_middleware,
        ));

    if let Some(validator) = validator {
        router = router.layer(middleware::from_fn_with_state(validator, auth_middleware));
    }

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(cors_layer(server))
            .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
