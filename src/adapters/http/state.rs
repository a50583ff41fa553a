//! Shared application state.

use std::sync::Arc;

use secrecy::Secret;

use super::error::{ApiError, ApiErrorKind};
use crate::application::handlers::{
    AnalyzeDocumentHandler, ApplyBillingEventHandler, GetUsageStatusHandler, ResetUsageHandler,
    SetUserTierHandler, SummarizeAnalysisHandler, SummaryLimits,
};
use crate::config::SummaryConfig;
use crate::domain::analysis::DivisionChunker;
use crate::domain::flags::FlagResolver;
use crate::domain::gate::ApiGate;
use crate::domain::membership::BillingWebhookVerifier;
use crate::ports::{AIProvider, TierDirectory};

/// State shared by every route.
///
/// Cloned per request; dependencies are Arc-wrapped and handlers are built on
/// demand from them.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<ApiGate>,
    pub tiers: Arc<dyn TierDirectory>,
    /// `None` when no LLM key is configured.
    pub ai_provider: Option<Arc<dyn AIProvider>>,
    pub webhook_secret: Option<Secret<String>>,
    pub summary: SummaryConfig,
    /// Attach internal error details to responses. Configuration never
    /// enables this in production.
    pub verbose_errors: bool,
}

impl AppState {
    pub fn resolver(&self) -> Arc<FlagResolver> {
        self.gate.resolver().clone()
    }

    pub fn summarize_handler(&self) -> SummarizeAnalysisHandler {
        SummarizeAnalysisHandler::new(
            self.ai_provider.clone(),
            DivisionChunker::new(self.summary.chunk_max_tokens),
            SummaryLimits::from(&self.summary),
        )
        .with_temperature(self.summary.temperature)
    }

    pub fn analyze_handler(&self) -> AnalyzeDocumentHandler {
        AnalyzeDocumentHandler::new(self.ai_provider.clone(), self.gate.usage().clone())
    }

    pub fn billing_handler(&self) -> ApplyBillingEventHandler {
        let verifier = self.webhook_secret.clone().map(BillingWebhookVerifier::new);
        ApplyBillingEventHandler::new(verifier, self.tiers.clone())
    }

    pub fn set_tier_handler(&self) -> SetUserTierHandler {
        SetUserTierHandler::new(self.tiers.clone())
    }

    pub fn usage_status_handler(&self) -> GetUsageStatusHandler {
        GetUsageStatusHandler::new(self.gate.clone())
    }

    pub fn reset_usage_handler(&self) -> ResetUsageHandler {
        ResetUsageHandler::new(self.gate.usage().clone())
    }

    /// Converts a failure into an `ApiError` under this deployment's
    /// verbosity.
    pub fn fail(&self, error: impl Into<ApiErrorKind>) -> ApiError {
        ApiError::new(error).verbose(self.verbose_errors)
    }
}
