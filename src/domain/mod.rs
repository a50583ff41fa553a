//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, auth types, errors)
//! - `flags` - Feature flag vocabulary, overrides and resolution
//! - `membership` - Tiers, their presets and quotas, billing events
//! - `usage` - Monthly analysis counters and the fail-open policy
//! - `gate` - Per-request auth, flag and quota checks
//! - `analysis` - Extracted bid analyses and division chunking
//! - `summary` - Chunked LLM summaries with merge and hard cap

pub mod analysis;
pub mod flags;
pub mod foundation;
pub mod gate;
pub mod membership;
pub mod summary;
pub mod usage;
