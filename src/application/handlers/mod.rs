//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analysis;
pub mod membership;
pub mod summary;
pub mod usage;

pub use analysis::{
    AnalyzeDocumentCommand, AnalyzeDocumentError, AnalyzeDocumentHandler, AnalyzeDocumentResult,
};
pub use membership::{
    ApplyBillingEventCommand, ApplyBillingEventHandler, ApplyBillingEventResult,
    SetUserTierCommand, SetUserTierHandler,
};
pub use summary::{
    SummarizeAnalysisCommand, SummarizeAnalysisError, SummarizeAnalysisHandler,
    SummarizeAnalysisResult, SummaryLimits,
};
pub use usage::{
    GetUsageStatusHandler, GetUsageStatusQuery, ResetUsageCommand, ResetUsageError,
    ResetUsageHandler,
};
