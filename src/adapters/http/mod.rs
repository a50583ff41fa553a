//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers and routes; `router`
//! assembles them with the middleware and tower layers.

pub mod claude;
pub mod error;
pub mod flags;
pub mod membership;
pub mod middleware;
pub mod router;
pub mod state;
pub mod usage;

pub use error::{ApiError, ApiErrorKind, ErrorResponse};
pub use router::app_router;
pub use state::AppState;
