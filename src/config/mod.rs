//! Application configuration module
//!
//! Type-safe configuration loaded once at startup from environment variables
//! using the `config` and `dotenvy` crates. Variables carry the
//! `BID_ANALYZER` prefix and nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use bid_analyzer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod auth;
mod billing;
mod error;
mod features;
mod redis;
mod server;
mod summary;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use billing::BillingConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeaturesConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use summary::SummaryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development configuration with in-memory stores, anonymous requests and
/// no LLM.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Usage counters and tier directory
    #[serde(default)]
    pub redis: RedisConfig,

    /// Session token validation (OIDC)
    #[serde(default)]
    pub auth: AuthConfig,

    /// LLM provider (Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Flag defaults and the debug override channel
    #[serde(default)]
    pub features: FeaturesConfig,

    /// Subscription webhooks
    #[serde(default)]
    pub billing: BillingConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `BID_ANALYZER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `BID_ANALYZER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BID_ANALYZER__FEATURES__DEFAULTS__AI_SUMMARY=true` -> `features.defaults.ai_summary`
    /// - `NEXT_PUBLIC_ENABLE_AI_SUMMARY=true` -> `features.public_defaults.ai_summary`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BID_ANALYZER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.features.public_defaults = config::Config::builder()
            .add_source(config::Environment::with_prefix("NEXT_PUBLIC_ENABLE"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Production additionally requires Redis, an HTTPS issuer and a
    /// webhook secret, and refuses the debug override channel.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = self.server.environment;
        self.server.validate()?;
        self.redis.validate(environment)?;
        self.auth.validate(environment)?;
        self.features.validate(environment)?;
        self.billing.validate(environment)?;
        self.summary.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
