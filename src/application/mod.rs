//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Gating happens before a handler runs; handlers assume the caller passed.

pub mod handlers;
