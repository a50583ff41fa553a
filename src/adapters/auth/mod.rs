//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwks` - Production OIDC validation against the issuer's JWKS
//! - `mock` - Test implementation that doesn't require external services

mod jwks;
mod mock;

pub use jwks::{JwksConfig, JwksSessionValidator};
pub use mock::MockSessionValidator;
