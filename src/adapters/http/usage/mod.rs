//! HTTP adapter for usage inspection. Development only.
//!
//! - `GET /api/usage` - Current month's usage for the caller
//! - `DELETE /api/usage` - Reset the caller's current-month counter

pub mod handlers;
pub mod routes;

pub use routes::usage_routes;
