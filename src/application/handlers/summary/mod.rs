//! Summary handlers.

mod summarize_analysis;

pub use summarize_analysis::{
    SummarizeAnalysisCommand, SummarizeAnalysisError, SummarizeAnalysisHandler,
    SummarizeAnalysisResult, SummaryLimits,
};
