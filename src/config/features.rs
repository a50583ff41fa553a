//! Feature flag configuration
//!
//! Environment defaults for every flag plus the debug override channel.
//! Defaults are keyed by flag name, e.g.
//! `BID_ANALYZER__FEATURES__DEFAULTS__AI_SUMMARY=true`. The web client's
//! `NEXT_PUBLIC_ENABLE_AI_SUMMARY=true` form is read as well.

use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::flags::{Flag, FlagSet, OverrideCodec};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeaturesConfig {
    /// Per-flag defaults; unnamed flags keep their baseline value.
    #[serde(default)]
    pub defaults: HashMap<String, bool>,

    /// Defaults from `NEXT_PUBLIC_ENABLE_<FLAG>` variables, filled by
    /// `AppConfig::load`. Entries in `defaults` win over these.
    #[serde(skip)]
    pub public_defaults: HashMap<String, bool>,

    /// Accept `x-ff` / `ff` flag overrides. Refused in production.
    #[serde(default)]
    pub debug_overrides_enabled: bool,

    /// When set, overrides must carry an HMAC-SHA256 signature.
    pub override_signing_secret: Option<Secret<String>>,

    /// Show detailed error messages (never honoured in production)
    #[serde(default)]
    pub verbose_errors: bool,
}

impl FeaturesConfig {
    /// The environment-default flag set.
    pub fn flag_defaults(&self) -> Result<FlagSet, ValidationError> {
        let mut flags = FlagSet::baseline();
        for (name, value) in &self.public_defaults {
            match name.parse::<Flag>() {
                Ok(flag) => flags.set(flag, *value),
                Err(_) => tracing::debug!(name = %name, "Ignoring unrelated NEXT_PUBLIC_ENABLE variable"),
            }
        }
        for (name, value) in &self.defaults {
            let flag: Flag = name
                .parse()
                .map_err(|_| ValidationError::UnknownFlag(name.clone()))?;
            flags.set(flag, *value);
        }
        Ok(flags)
    }

    /// Codec for the override channel, or `None` when overrides are off.
    pub fn override_codec(&self, environment: Environment) -> Option<OverrideCodec> {
        if !self.debug_overrides_enabled || environment == Environment::Production {
            return None;
        }
        Some(match &self.override_signing_secret {
            Some(secret) => OverrideCodec::signed(secret.clone()),
            None => OverrideCodec::unsigned(),
        })
    }

    pub fn verbose_errors(&self, environment: Environment) -> bool {
        self.verbose_errors && environment != Environment::Production
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        self.flag_defaults()?;
        if self.debug_overrides_enabled && environment == Environment::Production {
            return Err(ValidationError::DebugOverridesInProduction);
        }
        Ok(())
    }
}
