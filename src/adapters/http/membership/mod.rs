//! HTTP adapter for tier changes.
//!
//! - `POST /api/webhooks/billing` - Signed subscription events
//! - `PUT /api/admin/tier` - Set a user's tier directly (development only)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::{admin_routes, webhook_routes};
