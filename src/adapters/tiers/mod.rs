//! Tier directory adapters.
//!
//! - `InMemoryTierDirectory` - In-memory for testing and single-server
//! - `RedisTierDirectory` - Redis-backed for production

mod in_memory;
mod redis;

pub use in_memory::InMemoryTierDirectory;
pub use self::redis::RedisTierDirectory;
