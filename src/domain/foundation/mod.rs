//! Foundation module - Shared domain primitives.
//!
//! Identifiers, time values, authentication types and validation errors used
//! across the gating, usage and summary modules.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::ValidationError;
pub use ids::{TraceId, UserId};
pub use timestamp::{MonthKey, Timestamp};
