//! UsageCounterStore port - Interface for the external monthly counter store.
//!
//! The store only needs three primitives: an atomic increment that also
//! (re)sets an expiry, a read and a delete. Quota policy lives in
//! `UsageLedger`, not here.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::usage::UsageKey;

/// Port for per-user, per-month analysis counters.
///
/// Implementations must make `increment` atomic: concurrent requests for the
/// same key may not lose updates.
#[async_trait]
pub trait UsageCounterStore: Send + Sync {
    /// Atomically adds one to the counter, creating it at 1 if absent, and
    /// refreshes its expiry to `ttl`. Returns the new value.
    async fn increment(&self, key: &UsageKey, ttl: Duration) -> Result<u64, UsageStoreError>;

    /// Current value, `None` when the counter does not exist.
    async fn get(&self, key: &UsageKey) -> Result<Option<u64>, UsageStoreError>;

    /// Removes the counter. Deleting a missing counter is not an error.
    async fn delete(&self, key: &UsageKey) -> Result<(), UsageStoreError>;
}

/// Counter store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageStoreError {
    /// Store unreachable or the command failed.
    #[error("usage store unavailable: {0}")]
    Unavailable(String),

    /// The stored value is not a counter.
    #[error("usage counter {key} holds a non-numeric value")]
    Corrupt { key: String },
}

impl UsageStoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_context() {
        assert_eq!(
            UsageStoreError::unavailable("connection refused").to_string(),
            "usage store unavailable: connection refused"
        );
        assert_eq!(
            UsageStoreError::Corrupt {
                key: "usage:u1:2025-01".to_string()
            }
            .to_string(),
            "usage counter usage:u1:2025-01 holds a non-numeric value"
        );
    }

    #[test]
    fn usage_counter_store_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn UsageCounterStore>();
    }
}
