//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (Anthropic, mock)
//! - `auth` - Session token validation (OIDC JWKS, mock)
//! - `http` - Axum REST API
//! - `tiers` - Tier directory (Redis, in-memory)
//! - `usage` - Usage counters (Redis, in-memory)

pub mod ai;
pub mod auth;
pub mod http;
pub mod tiers;
pub mod usage;
