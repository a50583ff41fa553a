//! Tier presets and quotas.
//!
//! Defines which flags each tier turns on and how many analyses it may run
//! per calendar month.

use super::Tier;
use crate::domain::flags::{Flag, PartialFlags};
use serde::Serialize;

/// Entitlements for a subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLimits {
    /// The tier these limits apply to.
    pub tier: Tier,
    /// Analyses allowed per calendar month. None = unlimited.
    pub monthly_analyses: Option<u32>,
    /// Flags this tier sets. Flags not listed keep their default.
    pub preset: PartialFlags,
}

impl TierLimits {
    /// Get the limits for a specific tier.
    ///
    /// # Tier Configuration
    ///
    /// | Tier | Analyses/month | Leveling | Exports | AI summary | Projects | Team sharing |
    /// |------|----------------|----------|---------|------------|----------|--------------|
    /// | Starter | 3 | No | PDF only | No | No | No |
    /// | Pro | 25 | Yes | Yes | Yes | Yes | No |
    /// | Team | 100 | Yes | Yes | Yes | Yes | Yes |
    /// | Enterprise | Unlimited | Yes | Yes | Yes | Yes | Yes |
    ///
    /// Presets never touch `auth` or `usageLimits`; those are deployment
    /// decisions, not plan features.
    pub fn for_tier(tier: Tier) -> Self {
        let preset = PartialFlags::default().with(Flag::BidAnalysis, true);
        match tier {
            Tier::Starter => Self {
                tier,
                monthly_analyses: Some(3),
                preset: preset
                    .with(Flag::BidLeveling, false)
                    .with(Flag::ExportBidLeveling, false)
                    .with(Flag::ExportPdf, true)
                    .with(Flag::ExportExcel, false)
                    .with(Flag::AiSummary, false)
                    .with(Flag::ProjectManagement, false)
                    .with(Flag::TeamSharing, false),
            },
            Tier::Pro => Self {
                tier,
                monthly_analyses: Some(25),
                preset: paid_preset(preset).with(Flag::TeamSharing, false),
            },
            Tier::Team => Self {
                tier,
                monthly_analyses: Some(100),
                preset: paid_preset(preset).with(Flag::TeamSharing, true),
            },
            Tier::Enterprise => Self {
                tier,
                monthly_analyses: None, // Unlimited
                preset: paid_preset(preset).with(Flag::TeamSharing, true),
            },
        }
    }

    /// True when the tier has no monthly quota.
    pub fn is_unlimited(&self) -> bool {
        self.monthly_analyses.is_none()
    }

    /// Check if the monthly analysis limit has been reached.
    ///
    /// Returns false if unlimited or under limit.
    pub fn analysis_limit_reached(&self, used_this_month: u64) -> bool {
        self.monthly_analyses
            .map(|max| used_this_month >= u64::from(max))
            .unwrap_or(false)
    }

    /// Analyses left this month. None = unlimited.
    pub fn remaining(&self, used_this_month: u64) -> Option<u64> {
        self.monthly_analyses
            .map(|max| u64::from(max).saturating_sub(used_this_month))
    }
}

fn paid_preset(base: PartialFlags) -> PartialFlags {
    base.with(Flag::BidLeveling, true)
        .with(Flag::ExportBidLeveling, true)
        .with(Flag::ExportPdf, true)
        .with(Flag::ExportExcel, true)
        .with(Flag::AiSummary, true)
        .with(Flag::ProjectManagement, true)
}

impl Tier {
    /// Partial flag map this tier overlays on the defaults.
    pub fn preset(&self) -> PartialFlags {
        TierLimits::for_tier(*self).preset
    }

    /// Monthly analysis quota. None = unlimited.
    pub fn monthly_limit(&self) -> Option<u32> {
        TierLimits::for_tier(*self).monthly_analyses
    }
}
