//! SetUserTierHandler - Assigns a tier without a billing event.
//! Only mounted in development.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::membership::Tier;
use crate::ports::{TierDirectory, TierDirectoryError};

#[derive(Debug, Clone)]
pub struct SetUserTierCommand {
    pub user_id: UserId,
    pub tier: Tier,
}

pub struct SetUserTierHandler {
    tiers: Arc<dyn TierDirectory>,
}

impl SetUserTierHandler {
    pub fn new(tiers: Arc<dyn TierDirectory>) -> Self {
        Self { tiers }
    }

    pub async fn handle(&self, cmd: SetUserTierCommand) -> Result<(), TierDirectoryError> {
        self.tiers.set_tier(&cmd.user_id, cmd.tier).await?;
        tracing::info!(user_id = %cmd.user_id, tier = %cmd.tier, "Tier set by admin");
        Ok(())
    }
}
