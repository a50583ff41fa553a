//! Redis configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Redis configuration. Usage counters and tier assignments live here.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL; empty selects the in-memory stores (not allowed
    /// in production).
    #[serde(default)]
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Validate Redis configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if !self.is_configured() {
            return match environment {
                Environment::Production => Err(ValidationError::MissingRequired("REDIS__URL")),
                _ => Ok(()),
            };
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
