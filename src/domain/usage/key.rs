//! Usage counter keys.

use crate::domain::foundation::{MonthKey, UserId};

/// Identifies one user's analysis counter for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageKey {
    pub user_id: UserId,
    pub month: MonthKey,
}

impl UsageKey {
    pub fn new(user_id: UserId, month: MonthKey) -> Self {
        Self { user_id, month }
    }

    /// Counter for the current UTC month.
    pub fn current(user_id: UserId) -> Self {
        Self::new(user_id, MonthKey::current())
    }

    /// Storage key: `usage:<userId>:<YYYY-MM>`.
    pub fn storage_key(&self) -> String {
        format!("usage:{}:{}", self.user_id, self.month)
    }
}
