//! Scripted `AIProvider` for tests.
//!
//! Replies are handed out in the order calls reach the provider, so
//! concurrent chunk calls see them in call order. Once the script runs out,
//! every call gets [`MockAIProvider::DEFAULT_REPLY`].
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("## Overview\nThree bids received.")
//!     .with_error(AIError::Timeout { timeout_secs: 30 });
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::domain::analysis::estimate_tokens;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const MOCK_MODEL: &str = "mock-bid-model";

enum Scripted {
    Reply {
        content: String,
        finish_reason: FinishReason,
    },
    Fail(AIError),
}

#[derive(Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl MockAIProvider {
    pub const DEFAULT_REPLY: &'static str = "Mock response";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.enqueue(Scripted::Reply {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        })
    }

    /// A reply that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        self.enqueue(Scripted::Reply {
            content: content.into(),
            finish_reason: FinishReason::Length,
        })
    }

    pub fn with_error(self, error: AIError) -> Self {
        self.enqueue(Scripted::Fail(error))
    }

    /// Latency added to every call, after its reply has been claimed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Requests received so far, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn enqueue(self, entry: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }

    fn claim(&self) -> Option<Scripted> {
        self.script.lock().ok().and_then(|mut script| script.pop_front())
    }
}

impl std::fmt::Debug for MockAIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAIProvider")
            .field("calls", &self.call_count())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let prompt: String = request.messages.iter().map(|m| m.content.as_str()).collect();
        let prompt_tokens = self.estimate_tokens(&prompt);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        let scripted = self.claim();
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let (content, finish_reason) = match scripted {
            Some(Scripted::Reply {
                content,
                finish_reason,
            }) => (content, finish_reason),
            Some(Scripted::Fail(error)) => return Err(error),
            None => (Self::DEFAULT_REPLY.to_string(), FinishReason::Stop),
        };

        Ok(CompletionResponse {
            usage: TokenUsage::new(prompt_tokens, self.estimate_tokens(&content)),
            content,
            model: MOCK_MODEL.to_string(),
            finish_reason,
        })
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        u32::try_from(estimate_tokens(text)).unwrap_or(u32::MAX)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MOCK_MODEL, 200_000)
    }
}
