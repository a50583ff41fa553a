//! TierDirectory port - Where a user's subscription tier is recorded.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::membership::Tier;

/// Port for looking up and assigning subscription tiers.
///
/// Writes come only from the billing webhook and the development admin
/// endpoint; every gated request reads.
#[async_trait]
pub trait TierDirectory: Send + Sync {
    /// The user's tier, `None` when none has been assigned.
    async fn tier_for(&self, user_id: &UserId) -> Result<Option<Tier>, TierDirectoryError>;

    /// Assigns a tier, replacing any previous one.
    async fn set_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), TierDirectoryError>;
}

/// Tier directory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierDirectoryError {
    #[error("tier directory unavailable: {0}")]
    Unavailable(String),

    /// A stored tier name no longer parses.
    #[error("stored tier '{value}' for user {user_id} is not a known tier")]
    UnknownTier { user_id: String, value: String },
}
