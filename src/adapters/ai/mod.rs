//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port:
//!
//! - `AnthropicProvider` - Anthropic Claude models via the Messages API
//! - `MockAIProvider` - Configurable mock for testing

mod anthropic_provider;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider};
