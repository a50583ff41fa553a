//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Bearer token validation and the auth extractors
//! - `overrides` - Debug flag overrides from the `x-ff` header or `ff` cookie
//! - `request_context` - Per-request identity, overrides and trace id for handlers

pub mod auth;
pub mod overrides;
pub mod request_context;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
pub use overrides::{override_middleware, FlagOverrides};
pub use request_context::{RequestContext, REQUEST_ID_HEADER};
