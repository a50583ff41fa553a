//! Bid analyses: the extracted structure, its chunking for summary passes,
//! and strict parsing of extraction replies.

mod analysis_result;
mod chunker;
mod parsed;
mod prompts;

pub use analysis_result::{estimate_tokens, AnalysisResult};
pub use chunker::DivisionChunker;
pub use parsed::ParsedAnalysis;
pub use prompts::{extraction_user_prompt, EXTRACTION_SYSTEM_PROMPT};
