//! In-memory tier directory for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::membership::Tier;
use crate::ports::{TierDirectory, TierDirectoryError};

/// In-memory `TierDirectory` with lookup counting for tests.
#[derive(Debug, Default)]
pub struct InMemoryTierDirectory {
    tiers: Arc<RwLock<HashMap<UserId, Tier>>>,
    failing: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryTierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding.
    pub async fn with_tier(self, user_id: UserId, tier: Tier) -> Self {
        self.tiers.write().await.insert(user_id, tier);
        self
    }

    /// Simulates an unreachable directory.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `tier_for` calls served.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TierDirectory for InMemoryTierDirectory {
    async fn tier_for(&self, user_id: &UserId) -> Result<Option<Tier>, TierDirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TierDirectoryError::Unavailable("in-memory directory set to fail".into()));
        }
        Ok(self.tiers.read().await.get(user_id).copied())
    }

    async fn set_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), TierDirectoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TierDirectoryError::Unavailable("in-memory directory set to fail".into()));
        }
        self.tiers.write().await.insert(user_id.clone(), tier);
        Ok(())
    }
}
