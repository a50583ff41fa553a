//! Bearer-token authentication for axum.
//!
//! `auth_middleware` resolves the session token through the
//! `SessionValidator` port and stores the `AuthenticatedUser` in request
//! extensions. A request without a token stays anonymous; whether that is
//! acceptable is the gate's call, not this layer's. `RequireAuth` is for
//! routes that are meaningless without a user.
//!
//! When no validator is configured the layer is not installed at all.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::super::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

pub type AuthState = Arc<dyn SessionValidator>;

/// Resolves `Authorization: Bearer <token>` into an `AuthenticatedUser`.
///
/// A token that fails validation is answered here with 401, or 503 when the
/// identity provider is down. Other schemes are ignored.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(&e),
    }
}

fn auth_error_response(error: &AuthError) -> Response {
    let status = if error.is_transient() {
        tracing::error!(error = %error, "Session validation unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        tracing::debug!(error = %error, "Session token rejected");
        StatusCode::UNAUTHORIZED
    };
    let message = match error {
        AuthError::ServiceUnavailable(_) => "Authentication service unavailable".to_string(),
        other => other.to_string(),
    };

    (status, Json(ErrorResponse::new(error.reason_code(), message))).into_response()
}

/// Extractor that requires authentication.
///
/// If no user is in the request extensions (i.e., auth middleware didn't
/// successfully validate a token), returns 401 Unauthorized.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "authentication_required",
                    "Authentication required",
                )),
            )
                .into_response(),
        }
    }
}
