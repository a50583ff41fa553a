//! ApplyBillingEventHandler - Command handler for billing provider webhooks.
//!
//! Verifies the signature, works out the tier change the event implies and
//! records it in the tier directory. Events that imply no change are
//! acknowledged so the provider stops redelivering them.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::membership::{BillingWebhookVerifier, Tier, WebhookError};
use crate::ports::TierDirectory;

/// Command to apply a billing webhook.
#[derive(Debug, Clone)]
pub struct ApplyBillingEventCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// Signature header value (`t=...,v1=...`).
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyBillingEventResult {
    /// The user's tier was written.
    TierUpdated {
        event_id: String,
        user_id: UserId,
        tier: Tier,
    },
    /// Event acknowledged but no action taken.
    Ignored { reason: String },
}

/// Handler for billing webhooks.
pub struct ApplyBillingEventHandler {
    /// `None` when no webhook secret is configured.
    verifier: Option<BillingWebhookVerifier>,
    tiers: Arc<dyn TierDirectory>,
}

impl ApplyBillingEventHandler {
    pub fn new(verifier: Option<BillingWebhookVerifier>, tiers: Arc<dyn TierDirectory>) -> Self {
        Self { verifier, tiers }
    }

    pub async fn handle(
        &self,
        cmd: ApplyBillingEventCommand,
    ) -> Result<ApplyBillingEventResult, WebhookError> {
        let verifier = self.verifier.as_ref().ok_or(WebhookError::NotConfigured)?;

        let event = verifier.verify_and_parse(&cmd.payload, &cmd.signature)?;

        let change = match event.tier_change() {
            Ok(change) => change,
            Err(WebhookError::Ignored(reason)) => {
                tracing::info!(event_id = %event.id, event_type = %event.event_type, reason = %reason, "Billing event ignored");
                return Ok(ApplyBillingEventResult::Ignored { reason });
            }
            Err(e) => return Err(e),
        };

        self.tiers
            .set_tier(&change.user_id, change.tier)
            .await
            .map_err(|e| {
                tracing::error!(event_id = %change.event_id, error = %e, "Failed to record tier change");
                WebhookError::StorageError(e.to_string())
            })?;

        tracing::info!(
            event_id = %change.event_id,
            user_id = %change.user_id,
            tier = %change.tier,
            "Tier updated from billing event"
        );

        Ok(ApplyBillingEventResult::TierUpdated {
            event_id: change.event_id,
            user_id: change.user_id,
            tier: change.tier,
        })
    }
}
