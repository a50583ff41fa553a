//! Markdown summaries of bid analyses: per-chunk LLM passes, merge,
//! sanitizing and the hard length cap.

mod cap;
mod prompts;
mod sanitize;
mod stitcher;

pub use cap::{hard_cap, TRUNCATION_MARKER};
pub use prompts::{default_sections, section_title, DEFAULT_SECTIONS};
pub use sanitize::sanitize_markdown;
pub use stitcher::{SummaryOutput, SummaryStitcher, PIECE_SEPARATOR};
