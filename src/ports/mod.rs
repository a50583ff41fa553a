//! Ports - Interfaces to the collaborators outside the domain.
//!
//! - `AIProvider` - LLM completions (Anthropic, mock)
//! - `SessionValidator` - Bearer token validation (JWKS, mock)
//! - `TierDirectory` - Per-user subscription tier (Redis, in-memory)
//! - `UsageCounterStore` - Monthly analysis counters (Redis, in-memory)

mod ai_provider;
mod session_validator;
mod tier_directory;
mod usage_counter_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use session_validator::SessionValidator;
pub use tier_directory::{TierDirectory, TierDirectoryError};
pub use usage_counter_store::{UsageCounterStore, UsageStoreError};
