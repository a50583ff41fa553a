//! Flag vocabulary: the `Flag` name enum, the complete `FlagSet` and the
//! sparse `PartialFlags` layer used by presets, defaults and overrides.
//!
//! All three are generated from one table by `define_flags!` so a new
//! capability cannot be added to one shape and forgotten in another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a flag name does not belong to the canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature flag: {0}")]
pub struct UnknownFlag(pub String);

macro_rules! define_flags {
    ($( $(#[$doc:meta])* $field:ident => $variant:ident = $wire:literal, )+) => {
        /// Name of a boolean capability.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Flag {
            $( $(#[$doc])* #[serde(rename = $wire)] $variant, )+
        }

        impl Flag {
            /// Every flag in the canonical shape, in declaration order.
            pub const ALL: &'static [Flag] = &[$(Flag::$variant),+];

            /// Wire name (camelCase), as used in JSON bodies and error payloads.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Flag::$variant => $wire,)+
                }
            }
        }

        /// A fully resolved flag set. Every capability has a value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct FlagSet {
            $( $(#[$doc])* pub $field: bool, )+
        }

        impl FlagSet {
            /// A set with every flag at `value`.
            pub fn uniform(value: bool) -> Self {
                Self { $($field: value,)+ }
            }

            /// Value of a single flag.
            pub fn get(&self, flag: Flag) -> bool {
                match flag {
                    $(Flag::$variant => self.$field,)+
                }
            }

            /// Sets a single flag.
            pub fn set(&mut self, flag: Flag, value: bool) {
                match flag {
                    $(Flag::$variant => self.$field = value,)+
                }
            }

            /// Overlays a partial layer; keys present in `layer` win.
            pub fn apply(mut self, layer: &PartialFlags) -> Self {
                $(
                    if let Some(value) = layer.$field {
                        self.$field = value;
                    }
                )+
                self
            }
        }

        /// Sparse flag layer. `None` means "leave the lower layer alone".
        ///
        /// Unknown keys are rejected on deserialization: override payloads are
        /// untrusted and must match the canonical shape exactly.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", deny_unknown_fields)]
        pub struct PartialFlags {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<bool>,
            )+
        }

        impl PartialFlags {
            /// Value this layer sets for `flag`, if any.
            pub fn get(&self, flag: Flag) -> Option<bool> {
                match flag {
                    $(Flag::$variant => self.$field,)+
                }
            }

            /// Builder-style setter.
            pub fn with(mut self, flag: Flag, value: bool) -> Self {
                match flag {
                    $(Flag::$variant => self.$field = Some(value),)+
                }
                self
            }

            /// True when the layer sets nothing.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }

            /// Number of keys this layer sets.
            pub fn len(&self) -> usize {
                0 $(+ usize::from(self.$field.is_some()))+
            }
        }
    };
}

define_flags! {
    /// Platform-wide sign-in requirement. When on, anonymous calls are refused
    /// even by endpoints that do not require auth themselves.
    auth => Auth = "auth",
    /// Upload bid documents and extract structured cost data.
    bid_analysis => BidAnalysis = "bidAnalysis",
    /// Side-by-side leveling of competing bids.
    bid_leveling => BidLeveling = "bidLeveling",
    /// Export of the leveling sheet.
    export_bid_leveling => ExportBidLeveling = "exportBidLeveling",
    /// PDF export of analyses.
    export_pdf => ExportPdf = "exportPdf",
    /// Spreadsheet export of analyses.
    export_excel => ExportExcel = "exportExcel",
    /// LLM-written narrative summaries.
    ai_summary => AiSummary = "aiSummary",
    /// Project dashboard and grouping of bids.
    project_management => ProjectManagement = "projectManagement",
    /// Sharing projects with team members.
    team_sharing => TeamSharing = "teamSharing",
    /// Monthly analysis quotas are enforced.
    usage_limits => UsageLimits = "usageLimits",
}

impl FlagSet {
    /// Baked-in defaults used when configuration says nothing about a flag.
    pub fn baseline() -> Self {
        let mut flags = Self::uniform(false);
        flags.auth = true;
        flags.bid_analysis = true;
        flags.usage_limits = true;
        flags
    }

    /// Flags that are on, in declaration order.
    pub fn enabled(&self) -> Vec<Flag> {
        Flag::ALL.iter().copied().filter(|f| self.get(*f)).collect()
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flag {
    type Err = UnknownFlag;

    /// Accepts the wire name (`exportBidLeveling`) or its snake_case form
    /// (`export_bid_leveling`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        Flag::ALL
            .iter()
            .copied()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownFlag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parses_wire_and_snake_names() {
        assert_eq!("exportBidLeveling".parse::<Flag>().unwrap(), Flag::ExportBidLeveling);
        assert_eq!("export_bid_leveling".parse::<Flag>().unwrap(), Flag::ExportBidLeveling);
        assert_eq!("AUTH".parse::<Flag>().unwrap(), Flag::Auth);
    }

    #[test]
    fn flag_rejects_unknown_names() {
        let err = "teleport".parse::<Flag>().unwrap_err();
        assert_eq!(err, UnknownFlag("teleport".to_string()));
    }

    #[test]
    fn flag_set_serializes_every_key() {
        let json = serde_json::to_value(FlagSet::baseline()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), Flag::ALL.len());
        for flag in Flag::ALL {
            assert!(object.contains_key(flag.as_str()), "missing {}", flag);
        }
    }

    #[test]
    fn apply_only_touches_listed_keys() {
        let base = FlagSet::uniform(false);
        let layer = PartialFlags::default().with(Flag::AiSummary, true);

        let merged = base.apply(&layer);

        assert!(merged.ai_summary);
        assert_eq!(merged.enabled(), vec![Flag::AiSummary]);
    }

    #[test]
    fn apply_can_switch_flags_off() {
        let merged = FlagSet::uniform(true).apply(&PartialFlags::default().with(Flag::Auth, false));
        assert!(!merged.auth);
        assert!(merged.bid_analysis);
    }

    #[test]
    fn partial_flags_rejects_unknown_keys() {
        let result = serde_json::from_str::<PartialFlags>(r#"{"bidAnalysis":true,"godMode":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn partial_flags_rejects_non_boolean_values() {
        let result = serde_json::from_str::<PartialFlags>(r#"{"bidAnalysis":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn partial_flags_counts_keys() {
        let layer: PartialFlags =
            serde_json::from_str(r#"{"bidLeveling":true,"teamSharing":false}"#).unwrap();
        assert_eq!(layer.len(), 2);
        assert!(!layer.is_empty());
        assert_eq!(layer.get(Flag::TeamSharing), Some(false));
        assert_eq!(layer.get(Flag::Auth), None);
    }

    #[test]
    fn baseline_requires_auth_and_enables_analysis() {
        let flags = FlagSet::baseline();
        assert!(flags.auth);
        assert!(flags.bid_analysis);
        assert!(flags.usage_limits);
        assert!(!flags.export_bid_leveling);
    }
}
