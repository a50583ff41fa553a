//! Session token validation port.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Turns a bearer token into the user it was issued to.
///
/// Implementations check signature, issuer, audience and expiry. Expiry is
/// reported as `TokenExpired` so clients can refresh instead of signing in
/// again; an unreachable key source is `ServiceUnavailable`, never
/// `InvalidToken`.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the raw JWT, without the `Bearer ` prefix.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
