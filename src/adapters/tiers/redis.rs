//! Redis-backed tier directory. Keys are `tier:<userId>`, values tier names.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::UserId;
use crate::domain::membership::Tier;
use crate::ports::{TierDirectory, TierDirectoryError};

#[derive(Clone)]
pub struct RedisTierDirectory {
    conn: MultiplexedConnection,
}

impl RedisTierDirectory {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    fn key(user_id: &UserId) -> String {
        format!("tier:{}", user_id)
    }
}

#[async_trait]
impl TierDirectory for RedisTierDirectory {
    async fn tier_for(&self, user_id: &UserId) -> Result<Option<Tier>, TierDirectoryError> {
        let mut conn = self.conn.clone();

        let stored: Option<String> = conn
            .get(Self::key(user_id))
            .await
            .map_err(|e: redis::RedisError| TierDirectoryError::Unavailable(e.to_string()))?;

        stored
            .map(|value| {
                value
                    .parse::<Tier>()
                    .map_err(|_| TierDirectoryError::UnknownTier {
                        user_id: user_id.to_string(),
                        value,
                    })
            })
            .transpose()
    }

    async fn set_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), TierDirectoryError> {
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(Self::key(user_id), tier.as_str())
            .await
            .map_err(|e: redis::RedisError| TierDirectoryError::Unavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RedisTierDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTierDirectory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed() {
        let user = UserId::new("user_9").unwrap();
        assert_eq!(RedisTierDirectory::key(&user), "tier:user_9");
    }
}
