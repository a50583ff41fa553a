//! GetUsageStatusHandler - Query handler for a user's monthly usage report.

use std::sync::Arc;

use crate::domain::foundation::{MonthKey, UserId};
use crate::domain::gate::ApiGate;
use crate::domain::usage::UsageStatus;

/// Query for a user's usage.
#[derive(Debug, Clone)]
pub struct GetUsageStatusQuery {
    pub user_id: UserId,
    /// Defaults to the current month.
    pub month: Option<MonthKey>,
}

/// Handler for usage reports.
///
/// Store failures are absorbed by the ledger, so this query cannot fail.
pub struct GetUsageStatusHandler {
    gate: Arc<ApiGate>,
}

impl GetUsageStatusHandler {
    pub fn new(gate: Arc<ApiGate>) -> Self {
        Self { gate }
    }

    pub async fn handle(&self, query: GetUsageStatusQuery) -> UsageStatus {
        let tier = self.gate.tier_of(&query.user_id).await;
        let month = query.month.unwrap_or_else(MonthKey::current);
        self.gate.usage().status_in(&query.user_id, tier, month).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tiers::InMemoryTierDirectory;
    use crate::adapters::usage::InMemoryUsageStore;
    use crate::domain::flags::{FlagResolver, FlagSet};
    use crate::domain::membership::Tier;
    use crate::domain::usage::UsageLedger;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    async fn handler(tier: Option<Tier>) -> (GetUsageStatusHandler, UsageLedger) {
        let tiers = match tier {
            Some(tier) => InMemoryTierDirectory::new().with_tier(user(), tier).await,
            None => InMemoryTierDirectory::new(),
        };
        let ledger = UsageLedger::new(Arc::new(InMemoryUsageStore::new()));
        let gate = ApiGate::new(
            Arc::new(FlagResolver::new(FlagSet::baseline())),
            Arc::new(tiers),
            ledger.clone(),
        );
        (GetUsageStatusHandler::new(Arc::new(gate)), ledger)
    }

    #[tokio::test]
    async fn reports_usage_against_stored_tier() {
        let (handler, ledger) = handler(Some(Tier::Pro)).await;
        ledger.increment(&user()).await;
        ledger.increment(&user()).await;

        let status = handler
            .handle(GetUsageStatusQuery {
                user_id: user(),
                month: None,
            })
            .await;

        assert_eq!(status.tier, Tier::Pro);
        assert_eq!(status.current_usage, 2);
        assert!(status.can_analyze);
    }

    #[tokio::test]
    async fn unknown_user_reports_lowest_tier_with_zero_usage() {
        let (handler, _) = handler(None).await;

        let status = handler
            .handle(GetUsageStatusQuery {
                user_id: user(),
                month: None,
            })
            .await;

        assert_eq!(status.tier, Tier::lowest());
        assert_eq!(status.current_usage, 0);
        assert!(!status.is_unlimited);
    }
}
