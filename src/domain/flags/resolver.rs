//! Three-layer flag resolution: defaults, tier preset, debug override.

use super::overrides::{OverrideCodec, OverrideSource};
use super::{FlagSet, PartialFlags};
use crate::domain::foundation::Timestamp;
use crate::domain::membership::Tier;

/// Merges configured defaults, a tier preset and an optional debug override
/// into a complete `FlagSet`. Later layers win key by key.
///
/// Built once at startup and shared read-only. Overrides are honoured only
/// when the resolver was built with an override codec, which the service
/// does only outside production with debug overrides switched on.
#[derive(Debug, Clone)]
pub struct FlagResolver {
    defaults: FlagSet,
    overrides: Option<OverrideCodec>,
}

impl FlagResolver {
    /// Resolver that ignores every override.
    pub fn new(defaults: FlagSet) -> Self {
        Self {
            defaults,
            overrides: None,
        }
    }

    /// Enables the debug override channel.
    pub fn with_overrides(mut self, codec: OverrideCodec) -> Self {
        self.overrides = Some(codec);
        self
    }

    pub fn defaults(&self) -> &FlagSet {
        &self.defaults
    }

    pub fn overrides_enabled(&self) -> bool {
        self.overrides.is_some()
    }

    /// Resolves the active flag set for a request.
    pub fn resolve(&self, tier: Option<Tier>, overrides: Option<&PartialFlags>) -> FlagSet {
        let mut flags = self.defaults;

        if let Some(tier) = tier {
            flags = flags.apply(&tier.preset());
        }

        match overrides {
            Some(layer) if self.overrides_enabled() => flags.apply(layer),
            Some(_) => {
                tracing::debug!("Ignoring flag override: debug overrides are disabled");
                flags
            }
            None => flags,
        }
    }

    /// Like `resolve`, for a tier name taken from an external system.
    ///
    /// An unrecognised name applies no preset.
    pub fn resolve_named(&self, tier: Option<&str>, overrides: Option<&PartialFlags>) -> FlagSet {
        let tier = tier.and_then(|name| match name.parse::<Tier>() {
            Ok(tier) => Some(tier),
            Err(_) => {
                tracing::warn!(tier = %name, "Unknown tier, applying no preset");
                None
            }
        });
        self.resolve(tier, overrides)
    }

    /// Decodes a raw override. Anything unusable is dropped with a warning.
    pub fn decode_override(&self, raw: &str, source: OverrideSource) -> Option<PartialFlags> {
        self.decode_override_at(raw, source, Timestamp::now())
    }

    pub(crate) fn decode_override_at(
        &self,
        raw: &str,
        source: OverrideSource,
        now: Timestamp,
    ) -> Option<PartialFlags> {
        let codec = self.overrides.as_ref()?;
        match codec.decode(raw, source, now) {
            Ok(flags) => {
                tracing::info!(source = source.name(), keys = flags.len(), "Applying flag override");
                Some(flags)
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "Ignoring malformed flag override");
                None
            }
        }
    }
}
