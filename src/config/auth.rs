//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (any OIDC issuer publishing a JWKS).
///
/// Leaving the issuer empty outside production runs the service with every
/// request anonymous.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Issuer URL; tokens' `iss` must match and keys come from its JWKS.
    #[serde(default)]
    pub issuer_url: String,

    /// Expected audience for tokens
    #[serde(default)]
    pub audience: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.issuer_url.is_empty()
    }

    /// Validate authentication configuration
    ///
    /// Production requires an HTTPS issuer and an audience.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if !self.is_configured() {
            return match environment {
                Environment::Production => Err(ValidationError::MissingRequired("AUTH__ISSUER_URL")),
                _ => Ok(()),
            };
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if environment == Environment::Production && !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer_url: String::new(),
            audience: String::new(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.jwks_cache_ttl(), Duration::from_secs(3600));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_unconfigured_auth_allowed_outside_production() {
        let config = AuthConfig::default();
        assert!(config.validate(Environment::Development).is_ok());
        assert!(config.validate(Environment::Production).is_err());
    }

    #[test]
    fn test_validation_missing_audience() {
        let config = AuthConfig {
            issuer_url: "https://auth.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__AUDIENCE"))
        );
    }

    #[test]
    fn test_validation_production_requires_https() {
        let config = AuthConfig {
            issuer_url: "http://localhost:8081".to_string(),
            audience: "bid-analyzer".to_string(),
            ..Default::default()
        };
        assert!(config.validate(Environment::Development).is_ok());
        assert_eq!(
            config.validate(Environment::Production),
            Err(ValidationError::IssuerMustBeHttps)
        );
    }
}
