//! ResetUsageHandler - Command handler that clears a user's current-month
//! counter. Only mounted in development.

use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::usage::UsageLedger;
use crate::ports::UsageStoreError;

#[derive(Debug, Clone)]
pub struct ResetUsageCommand {
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum ResetUsageError {
    #[error("Usage store unavailable: {0}")]
    Store(#[from] UsageStoreError),
}

pub struct ResetUsageHandler {
    usage: UsageLedger,
}

impl ResetUsageHandler {
    pub fn new(usage: UsageLedger) -> Self {
        Self { usage }
    }

    pub async fn handle(&self, cmd: ResetUsageCommand) -> Result<(), ResetUsageError> {
        self.usage.reset(&cmd.user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::usage::InMemoryUsageStore;
    use crate::domain::foundation::MonthKey;
    use std::sync::Arc;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn reset_clears_current_month() {
        let ledger = UsageLedger::new(Arc::new(InMemoryUsageStore::new()));
        ledger.increment(&user()).await;
        let handler = ResetUsageHandler::new(ledger.clone());

        handler.handle(ResetUsageCommand { user_id: user() }).await.unwrap();

        assert_eq!(ledger.count(&user(), MonthKey::current()).await, 0);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let store = Arc::new(InMemoryUsageStore::new());
        store.set_failing(true);
        let handler = ResetUsageHandler::new(UsageLedger::new(store));

        let result = handler.handle(ResetUsageCommand { user_id: user() }).await;

        assert!(matches!(result, Err(ResetUsageError::Store(_))));
    }
}
