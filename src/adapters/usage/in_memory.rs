//! In-memory usage counter store for testing and development.
//!
//! Honors TTLs lazily on read. Not suitable for multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::usage::UsageKey;
use crate::ports::{UsageCounterStore, UsageStoreError};

#[derive(Debug, Clone)]
struct Counter {
    value: u64,
    ttl: Duration,
    expires_at: Instant,
}

impl Counter {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory `UsageCounterStore`.
///
/// `set_failing(true)` makes every call return `Unavailable`, which tests use
/// to exercise the fail-open path.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    counters: Arc<RwLock<HashMap<String, Counter>>>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unreachable store.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `get` calls served (including failed ones).
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// TTL the counter was last given, if it exists.
    pub async fn ttl_of(&self, key: &UsageKey) -> Option<Duration> {
        let counters = self.counters.read().await;
        counters
            .get(&key.storage_key())
            .filter(|c| c.is_live(Instant::now()))
            .map(|c| c.ttl)
    }

    /// Sets a counter directly.
    pub async fn seed(&self, key: &UsageKey, value: u64, ttl: Duration) {
        let mut counters = self.counters.write().await;
        counters.insert(
            key.storage_key(),
            Counter {
                value,
                ttl,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn check_available(&self) -> Result<(), UsageStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UsageStoreError::unavailable("in-memory store set to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl UsageCounterStore for InMemoryUsageStore {
    async fn increment(&self, key: &UsageKey, ttl: Duration) -> Result<u64, UsageStoreError> {
        self.check_available()?;
        let now = Instant::now();
        let mut counters = self.counters.write().await;

        let counter = counters
            .entry(key.storage_key())
            .and_modify(|c| {
                if !c.is_live(now) {
                    c.value = 0;
                }
            })
            .or_insert(Counter {
                value: 0,
                ttl,
                expires_at: now + ttl,
            });

        counter.value += 1;
        counter.ttl = ttl;
        counter.expires_at = now + ttl;

        Ok(counter.value)
    }

    async fn get(&self, key: &UsageKey) -> Result<Option<u64>, UsageStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let counters = self.counters.read().await;
        Ok(counters
            .get(&key.storage_key())
            .filter(|c| c.is_live(Instant::now()))
            .map(|c| c.value))
    }

    async fn delete(&self, key: &UsageKey) -> Result<(), UsageStoreError> {
        self.check_available()?;
        let mut counters = self.counters.write().await;
        counters.remove(&key.storage_key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn key() -> UsageKey {
        UsageKey::current(UserId::new("user-1").unwrap())
    }

    #[tokio::test]
    async fn increment_starts_at_one() {
        let store = InMemoryUsageStore::new();
        assert_eq!(store.increment(&key(), Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(store.increment(&key(), Duration::from_secs(60)).await.unwrap(), 2);
        assert_eq!(store.get(&key()).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn expired_counter_reads_as_absent() {
        let store = InMemoryUsageStore::new();
        store.seed(&key(), 7, Duration::ZERO).await;

        assert_eq!(store.get(&key()).await.unwrap(), None);
        assert_eq!(store.increment(&key(), Duration::from_secs(60)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryUsageStore::new();
        store.delete(&key()).await.unwrap();
        store.increment(&key(), Duration::from_secs(60)).await.unwrap();
        store.delete(&key()).await.unwrap();
        assert_eq!(store.get(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failing_store_errors_everywhere() {
        let store = InMemoryUsageStore::new();
        store.set_failing(true);

        assert!(store.increment(&key(), Duration::from_secs(1)).await.is_err());
        assert!(store.get(&key()).await.is_err());
        assert!(store.delete(&key()).await.is_err());
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryUsageStore::new());
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment(&key(), Duration::from_secs(60)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get(&key()).await.unwrap(), Some(50));
    }
}
