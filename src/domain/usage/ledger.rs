//! Monthly analysis accounting on top of a `UsageCounterStore`.
//!
//! Store failures never block an analysis. The `try_*` methods surface the
//! store's `Result`; the plain methods apply the fail-open policy in
//! `fail_open`: log, treat the counter as 0, allow.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::UsageKey;
use crate::domain::foundation::{MonthKey, UserId};
use crate::domain::membership::{Tier, TierLimits};
use crate::ports::{UsageCounterStore, UsageStoreError};

/// Counters outlive their month by about a month, then expire.
pub const USAGE_TTL: Duration = Duration::from_secs(62 * 24 * 60 * 60);

/// Usage report for one user and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    pub tier: Tier,
    pub month_key: MonthKey,
    pub current_usage: u64,
    /// None = unlimited.
    pub limit: Option<u32>,
    /// None = unlimited.
    pub remaining: Option<u64>,
    pub can_analyze: bool,
    pub is_unlimited: bool,
}

/// Per-user monthly analysis counts against tier quotas.
#[derive(Clone)]
pub struct UsageLedger {
    store: Arc<dyn UsageCounterStore>,
}

impl UsageLedger {
    pub fn new(store: Arc<dyn UsageCounterStore>) -> Self {
        Self { store }
    }

    /// Records one analysis for the current month.
    ///
    /// Returns the new count, or `None` when the store failed (the failure is
    /// logged and the analysis stands).
    pub async fn increment(&self, user_id: &UserId) -> Option<u64> {
        let key = UsageKey::current(user_id.clone());
        match self.store.increment(&key, USAGE_TTL).await {
            Ok(count) => {
                tracing::debug!(key = %key.storage_key(), count, "Recorded analysis usage");
                Some(count)
            }
            Err(e) => {
                tracing::warn!(key = %key.storage_key(), error = %e, "Usage increment failed, not recorded");
                None
            }
        }
    }

    /// Analyses recorded for `month`, as the store reports it.
    pub async fn try_count(&self, user_id: &UserId, month: MonthKey) -> Result<u64, UsageStoreError> {
        let key = UsageKey::new(user_id.clone(), month);
        Ok(self.store.get(&key).await?.unwrap_or(0))
    }

    /// Analyses recorded for `month`; 0 when absent or the store fails.
    pub async fn count(&self, user_id: &UserId, month: MonthKey) -> u64 {
        fail_open(self.try_count(user_id, month).await, 0, user_id, month)
    }

    /// Whether another analysis fits in the tier's quota this month.
    pub async fn can_use(&self, user_id: &UserId, tier: Tier) -> bool {
        self.can_use_in(user_id, tier, MonthKey::current()).await
    }

    pub async fn can_use_in(&self, user_id: &UserId, tier: Tier, month: MonthKey) -> bool {
        let limits = TierLimits::for_tier(tier);
        if limits.is_unlimited() {
            return true;
        }
        !limits.analysis_limit_reached(self.count(user_id, month).await)
    }

    /// Deletes the current month's counter. Development only.
    pub async fn reset(&self, user_id: &UserId) -> Result<(), UsageStoreError> {
        let key = UsageKey::current(user_id.clone());
        self.store.delete(&key).await?;
        tracing::info!(key = %key.storage_key(), "Usage counter reset");
        Ok(())
    }

    /// Usage report for the current month.
    pub async fn status(&self, user_id: &UserId, tier: Tier) -> UsageStatus {
        self.status_in(user_id, tier, MonthKey::current()).await
    }

    pub async fn status_in(&self, user_id: &UserId, tier: Tier, month: MonthKey) -> UsageStatus {
        let limits = TierLimits::for_tier(tier);
        let current_usage = self.count(user_id, month).await;

        UsageStatus {
            tier,
            month_key: month,
            current_usage,
            limit: limits.monthly_analyses,
            remaining: limits.remaining(current_usage),
            can_analyze: !limits.analysis_limit_reached(current_usage),
            is_unlimited: limits.is_unlimited(),
        }
    }
}

/// Fail-open policy for usage reads: a store failure counts as no usage.
fn fail_open(
    result: Result<u64, UsageStoreError>,
    fallback: u64,
    user_id: &UserId,
    month: MonthKey,
) -> u64 {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            user_id = %user_id,
            month = %month,
            error = %e,
            "Usage store read failed, failing open"
        );
        fallback
    })
}
