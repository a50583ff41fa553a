//! Subscription tier definitions.
//!
//! Represents the plan levels a bid analyzer account can be on.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription tier.
///
/// Determines the flag preset and the monthly analysis quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry plan - a handful of analyses a month, no leveling or AI summary.
    Starter,

    /// Single estimator plan.
    /// - 25 analyses a month
    /// - Bid leveling and exports
    /// - AI summaries
    Pro,

    /// Shared workspace plan.
    /// - 100 analyses a month
    /// - Everything in Pro plus team sharing
    Team,

    /// Negotiated plan - no analysis quota.
    Enterprise,
}

impl Tier {
    /// Every tier, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Starter, Tier::Pro, Tier::Team, Tier::Enterprise];

    /// The tier assumed when a user's tier is unknown or cannot be looked up.
    pub fn lowest() -> Self {
        Tier::Starter
    }

    /// Wire name, as stored in the tier directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Pro => "pro",
            Tier::Team => "team",
            Tier::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Tier::Starter),
            "pro" => Ok(Tier::Pro),
            "team" => Ok(Tier::Team),
            "enterprise" => Ok(Tier::Enterprise),
            _ => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_tier_is_starter() {
        assert_eq!(Tier::lowest(), Tier::Starter);
        assert_eq!(Tier::ALL[0], Tier::lowest());
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");
    }

    #[test]
    fn tier_deserializes_from_lowercase() {
        let tier: Tier = serde_json::from_str("\"team\"").unwrap();
        assert_eq!(tier, Tier::Team);
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!(" Pro ".parse::<Tier>().unwrap(), Tier::Pro);
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let err = "platinum".parse::<Tier>().unwrap_err();
        assert_eq!(err.field(), "tier");
    }
}
