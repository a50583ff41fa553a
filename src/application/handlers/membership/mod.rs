//! Membership handlers.
//!
//! ## Commands
//! - Applying signed billing events to the tier directory
//! - Setting a user's tier directly (development tooling)

mod apply_billing_event;
mod set_user_tier;

pub use apply_billing_event::{
    ApplyBillingEventCommand, ApplyBillingEventHandler, ApplyBillingEventResult,
};
pub use set_user_tier::{SetUserTierCommand, SetUserTierHandler};
