//! Usage accounting.
//!
//! - `key` - `usage:<userId>:<YYYY-MM>` counter keys
//! - `ledger` - Quota checks and the fail-open policy

mod key;
mod ledger;

pub use key::UsageKey;
pub use ledger::{UsageLedger, UsageStatus, USAGE_TTL};
