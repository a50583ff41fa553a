//! HTTP adapter for flag inspection.
//!
//! - `GET /api/flags` - Flags resolved for the caller (auth optional)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::FlagsResponse;
pub use routes::flag_routes;
