//! Membership domain module.
//!
//! Subscription tiers, their flag presets and quotas, and the billing
//! webhook events that move users between tiers.
//!
//! # Module Structure
//!
//! - `tier` - Tier subscription levels
//! - `tier_limits` - Flag preset and monthly quota per tier
//! - `billing_event` - Subscription events and the tier change they imply
//! - `webhook_verifier` - HMAC signature checking for billing webhooks

mod billing_event;
mod tier;
mod tier_limits;
mod webhook_errors;
mod webhook_verifier;

pub use billing_event::{BillingEvent, BillingEventType, Subscription, TierChange};
pub use tier::Tier;
pub use tier_limits::TierLimits;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{BillingWebhookVerifier, SignatureHeader};

#[cfg(test)]
pub use billing_event::BillingEventBuilder;
#[cfg(test)]
pub use webhook_verifier::sign_test_payload;
