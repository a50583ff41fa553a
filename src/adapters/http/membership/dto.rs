//! Request and response bodies for tier changes.

use serde::{Deserialize, Serialize};

use crate::domain::membership::Tier;

/// Request to set a user's tier.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTierRequest {
    #[serde(alias = "userId")]
    pub user_id: String,
    pub tier: Tier,
}

/// Webhook acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
    /// `"updated"` or `"ignored"`.
    pub outcome: &'static str,
}
