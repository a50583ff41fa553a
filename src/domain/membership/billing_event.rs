//! Billing webhook event types.
//!
//! Only the subscription lifecycle matters here: every handled event ends in
//! a `TierChange` for one user. Fields beyond what that needs are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Tier, WebhookError};
use crate::domain::foundation::UserId;

/// Billing webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEvent {
    /// Unique identifier for the event.
    pub id: String,

    /// Type of event (e.g., "customer.subscription.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: BillingEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEventData {
    /// The object that triggered the event.
    pub object: serde_json::Value,
}

/// The subscription object carried by `customer.subscription.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    /// Set at checkout: `user_id` and `tier`.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Subscription events this service reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEventType {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    /// Unknown or unhandled event type.
    Unknown,
}

impl BillingEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::Unknown => "unknown",
        }
    }
}

/// The effect of a billing event on one user's tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierChange {
    pub event_id: String,
    pub user_id: UserId,
    pub tier: Tier,
}

impl BillingEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> BillingEventType {
        BillingEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Works out which tier the subscription's owner ends up on.
    ///
    /// - created/updated while `active` or `trialing` → the tier in metadata
    /// - updated to `canceled`, `unpaid` or `incomplete_expired` → starter
    /// - deleted → starter
    /// - anything else → `WebhookError::Ignored`
    pub fn tier_change(&self) -> Result<TierChange, WebhookError> {
        let event_type = self.parsed_type();
        if event_type == BillingEventType::Unknown {
            return Err(WebhookError::Ignored(format!(
                "No handler for event type: {}",
                self.event_type
            )));
        }

        let subscription: Subscription = self
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("subscription object: {}", e)))?;

        let user_id = subscription
            .metadata
            .get("user_id")
            .ok_or(WebhookError::MissingMetadata("user_id"))?;
        let user_id = UserId::new(user_id.as_str())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let tier = match (event_type, subscription.status.as_str()) {
            (BillingEventType::SubscriptionDeleted, _) => Tier::lowest(),
            (_, "active") | (_, "trialing") => subscription
                .metadata
                .get("tier")
                .ok_or(WebhookError::MissingMetadata("tier"))?
                .parse::<Tier>()
                .map_err(|e| WebhookError::ParseError(e.to_string()))?,
            (_, "canceled") | (_, "unpaid") | (_, "incomplete_expired") => Tier::lowest(),
            (_, status) => {
                return Err(WebhookError::Ignored(format!(
                    "subscription {} is {}",
                    subscription.id, status
                )))
            }
        };

        Ok(TierChange {
            event_id: self.id.clone(),
            user_id,
            tier,
        })
    }
}

/// Builder for creating test BillingEvent instances.
#[cfg(test)]
pub struct BillingEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
}

#[cfg(test)]
impl Default for BillingEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "customer.subscription.updated".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
impl BillingEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn subscription(mut self, status: &str, user_id: &str, tier: Option<&str>) -> Self {
        let mut metadata = serde_json::Map::new();
        metadata.insert("user_id".into(), user_id.into());
        if let Some(tier) = tier {
            metadata.insert("tier".into(), tier.into());
        }
        self.object = serde_json::json!({
            "id": "sub_123",
            "status": status,
            "metadata": metadata,
        });
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> BillingEvent {
        BillingEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: BillingEventData {
                object: self.object,
            },
            livemode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_subscription_moves_user_to_metadata_tier() {
        let event = BillingEventBuilder::new()
            .event_type("customer.subscription.created")
            .subscription("active", "user-42", Some("pro"))
            .build();

        let change = event.tier_change().unwrap();

        assert_eq!(change.user_id.as_str(), "user-42");
        assert_eq!(change.tier, Tier::Pro);
        assert_eq!(change.event_id, "evt_test_123");
    }

    #[test]
    fn trialing_counts_as_active() {
        let event = BillingEventBuilder::new()
            .subscription("trialing", "user-42", Some("team"))
            .build();
        assert_eq!(event.tier_change().unwrap().tier, Tier::Team);
    }

    #[test]
    fn deleted_subscription_drops_to_starter() {
        let event = BillingEventBuilder::new()
            .event_type("customer.subscription.deleted")
            .subscription("canceled", "user-42", Some("enterprise"))
            .build();
        assert_eq!(event.tier_change().unwrap().tier, Tier::Starter);
    }

    #[test]
    fn canceled_update_drops_to_starter() {
        let event = BillingEventBuilder::new()
            .subscription("unpaid", "user-42", Some("pro"))
            .build();
        assert_eq!(event.tier_change().unwrap().tier, Tier::Starter);
    }

    #[test]
    fn past_due_is_ignored() {
        let event = BillingEventBuilder::new()
            .subscription("past_due", "user-42", Some("pro"))
            .build();
        assert!(matches!(event.tier_change(), Err(WebhookError::Ignored(_))));
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let event = BillingEventBuilder::new()
            .event_type("invoice.payment_succeeded")
            .build();
        assert!(matches!(event.tier_change(), Err(WebhookError::Ignored(_))));
    }

    #[test]
    fn missing_user_id_is_rejected() {
        let event = BillingEventBuilder::new()
            .object(serde_json::json!({"id": "sub_1", "status": "active", "metadata": {"tier": "pro"}}))
            .build();
        assert!(matches!(
            event.tier_change(),
            Err(WebhookError::MissingMetadata("user_id"))
        ));
    }

    #[test]
    fn active_without_tier_is_rejected() {
        let event = BillingEventBuilder::new()
            .subscription("active", "user-42", None)
            .build();
        assert!(matches!(
            event.tier_change(),
            Err(WebhookError::MissingMetadata("tier"))
        ));
    }

    #[test]
    fn unknown_tier_in_metadata_is_a_parse_error() {
        let event = BillingEventBuilder::new()
            .subscription("active", "user-42", Some("platinum"))
            .build();
        assert!(matches!(event.tier_change(), Err(WebhookError::ParseError(_))));
    }
}
