//! Usage counter store adapters.

mod in_memory;
mod redis;

pub use in_memory::InMemoryUsageStore;
pub use self::redis::RedisUsageStore;
