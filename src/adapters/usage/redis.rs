//! Redis-backed usage counter store for production deployments.
//!
//! INCR and EXPIRE run in one MULTI/EXEC so every increment refreshes the
//! TTL and no increment is lost between concurrent requests.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::usage::UsageKey;
use crate::ports::{UsageCounterStore, UsageStoreError};

/// Redis `UsageCounterStore`. Keys are `usage:<userId>:<YYYY-MM>`.
#[derive(Clone)]
pub struct RedisUsageStore {
    conn: MultiplexedConnection,
}

impl RedisUsageStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

fn map_redis_error(key: &str, e: redis::RedisError) -> UsageStoreError {
    if e.kind() == redis::ErrorKind::TypeError {
        UsageStoreError::Corrupt {
            key: key.to_string(),
        }
    } else {
        UsageStoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl UsageCounterStore for RedisUsageStore {
    async fn increment(&self, key: &UsageKey, ttl: Duration) -> Result<u64, UsageStoreError> {
        let redis_key = key.storage_key();
        let mut conn = self.conn.clone();

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(&redis_key, 1_u64)
            .expire(&redis_key, ttl.as_secs() as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| map_redis_error(&redis_key, e))?;

        Ok(count)
    }

    async fn get(&self, key: &UsageKey) -> Result<Option<u64>, UsageStoreError> {
        let redis_key = key.storage_key();
        let mut conn = self.conn.clone();

        conn.get::<_, Option<u64>>(&redis_key)
            .await
            .map_err(|e: redis::RedisError| map_redis_error(&redis_key, e))
    }

    async fn delete(&self, key: &UsageKey) -> Result<(), UsageStoreError> {
        let redis_key = key.storage_key();
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&redis_key)
            .await
            .map_err(|e: redis::RedisError| UsageStoreError::Unavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RedisUsageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUsageStore").finish_non_exhaustive()
    }
}
