//! Billing webhook configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BillingConfig {
    /// Shared secret for webhook signatures. Without it the webhook endpoint
    /// answers 503.
    pub webhook_secret: Option<Secret<String>>,
}

impl BillingConfig {
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if environment == Environment::Production && self.webhook_secret.is_none() {
            return Err(ValidationError::MissingRequired("BILLING__WEBHOOK_SECRET"));
        }
        Ok(())
    }
}
