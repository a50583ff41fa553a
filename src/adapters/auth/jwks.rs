//! OIDC adapter for JWT validation against an issuer's JWKS.
//!
//! Implements the `SessionValidator` port for any OIDC identity provider:
//!
//! 1. Fetch the issuer's JWKS (cached, refetched after the cache window)
//! 2. Validate the JWT signature against the key named by `kid`
//! 3. Validate issuer, audience and expiry
//! 4. Map claims to `AuthenticatedUser`
//!
//! # Example
//!
//! ```ignore
//! let config = JwksConfig::new("https://auth.example.com", "bid-analyzer-api");
//! let validator = JwksSessionValidator::new(config)?;
//! let user = validator.validate("eyJ...").await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(3600);

/// Configuration for the JWKS validator.
#[derive(Debug, Clone)]
pub struct JwksConfig {
    /// Issuer URL, used for JWKS discovery and `iss` validation.
    pub issuer_url: String,

    /// Tokens must list this audience.
    pub audience: String,

    /// How long fetched keys are reused. Defaults to 1 hour.
    pub jwks_cache_duration: Option<Duration>,
}

impl JwksConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_cache_duration: None,
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url.trim_end_matches('/'))
    }
}

/// Claims this service reads.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,

    #[serde(default)]
    email: Option<String>,
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// Production `SessionValidator`.
pub struct JwksSessionValidator {
    config: JwksConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksSessionValidator {
    /// Creates the validator. Keys are fetched lazily on first validation.
    pub fn new(config: JwksConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(url = %url, "Fetching JWKS");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    /// Get JWKS, using cache if available and not expired.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| !c.is_expired()) {
                return Ok(cached.jwks.clone());
            }
        }

        let jwks = self.fetch_jwks().await?;

        let duration = self.config.jwks_cache_duration.unwrap_or(DEFAULT_JWKS_CACHE);
        *self.jwks_cache.write().await = Some(JwksCache::new(jwks.clone(), duration));

        Ok(jwks)
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

/// Decoding key and algorithm for the key named in the token header.
fn find_decoding_key(
    header: &jsonwebtoken::Header,
    jwks: &JwkSet,
) -> Result<(DecodingKey, Algorithm), AuthError> {
    let kid = header.kid.as_ref().ok_or_else(|| {
        tracing::warn!("JWT missing 'kid' header");
        AuthError::InvalidToken
    })?;

    let jwk = jwks.find(kid).ok_or_else(|| {
        tracing::warn!(kid = %kid, "No matching key in JWKS");
        AuthError::InvalidToken
    })?;

    let algorithm = match jwk.common.key_algorithm {
        Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
        Some(KeyAlgorithm::RS384) => Algorithm::RS384,
        Some(KeyAlgorithm::RS512) => Algorithm::RS512,
        Some(KeyAlgorithm::ES256) => Algorithm::ES256,
        Some(KeyAlgorithm::ES384) => Algorithm::ES384,
        Some(other) => {
            tracing::warn!(algorithm = ?other, "Unsupported JWK algorithm");
            return Err(AuthError::InvalidToken);
        }
    };

    let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!(error = %e, "Failed to create decoding key");
        AuthError::InvalidToken
    })?;

    Ok((decoding_key, algorithm))
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::InvalidToken
        }
    }
}

fn claims_to_user(claims: SessionClaims) -> Result<AuthenticatedUser, AuthError> {
    let id = UserId::new(&claims.sub).map_err(|_| {
        tracing::warn!(sub = %claims.sub, "Token subject is not a valid user id");
        AuthError::InvalidToken
    })?;
    Ok(AuthenticatedUser::new(id, claims.email))
}

#[async_trait]
impl SessionValidator for JwksSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode JWT header");
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let (decoding_key, algorithm) = find_decoding_key(&header, &jwks)?;

        let token_data = decode::<SessionClaims>(token, &decoding_key, &self.validation(algorithm))
            .map_err(map_decode_error)?;

        claims_to_user(token_data.claims)
    }
}

impl std::fmt::Debug for JwksSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error, ErrorKind};
    use jsonwebtoken::Header;

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_builds_jwks_url_without_double_slash() {
        let config = JwksConfig::new("https://auth.example.com/", "bid-api");
        assert_eq!(config.jwks_url(), "https://auth.example.com/.well-known/jwks.json");
    }

    #[test]
    fn config_with_custom_cache_duration() {
        let config = JwksConfig::new("https://auth.example.com", "bid-api")
            .with_cache_duration(Duration::from_secs(300));
        assert_eq!(config.jwks_cache_duration, Some(Duration::from_secs(300)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Key selection and claims
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn header_without_kid_is_rejected() {
        let jwks = JwkSet { keys: vec![] };
        let result = find_decoding_key(&Header::new(Algorithm::RS256), &jwks);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn unknown_kid_is_rejected() {
        let jwks = JwkSet { keys: vec![] };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some("rotated-away".to_string());
        assert!(matches!(find_decoding_key(&header, &jwks), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn claims_map_to_user() {
        let claims: SessionClaims =
            serde_json::from_str(r#"{"sub":"user_2abc","email":"pm@builder.com","exp":1}"#).unwrap();

        let user = claims_to_user(claims).unwrap();

        assert_eq!(user.id.as_str(), "user_2abc");
        assert_eq!(user.email.as_deref(), Some("pm@builder.com"));
    }

    #[test]
    fn email_claim_is_optional() {
        let claims: SessionClaims = serde_json::from_str(r#"{"sub":"user_2abc"}"#).unwrap();
        assert_eq!(claims_to_user(claims).unwrap().email, None);
    }

    #[test]
    fn invalid_subject_is_rejected() {
        let claims: SessionClaims = serde_json::from_str(r#"{"sub":"a:b"}"#).unwrap();
        assert!(matches!(claims_to_user(claims), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_signature_maps_to_token_expired() {
        let err: Error = ErrorKind::ExpiredSignature.into();
        assert_eq!(map_decode_error(err), AuthError::TokenExpired);

        let err: Error = ErrorKind::InvalidAudience.into();
        assert_eq!(map_decode_error(err), AuthError::InvalidToken);
    }

    #[test]
    fn jwks_cache_expires_after_duration() {
        let cache = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.is_expired());
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwksSessionValidator>();
    }

    #[tokio::test]
    #[ignore = "Requires a live OIDC issuer"]
    async fn fetches_jwks_from_issuer() {
        let issuer = std::env::var("OIDC_ISSUER_URL").unwrap();
        let validator = JwksSessionValidator::new(JwksConfig::new(issuer, "test")).unwrap();

        let jwks = validator.fetch_jwks().await.unwrap();

        assert!(!jwks.keys.is_empty());
    }
}
