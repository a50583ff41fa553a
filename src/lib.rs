//! Bid Analyzer - gating, usage accounting and LLM summaries for
//! construction bid analysis.
//!
//! Every paid capability sits behind an `ApiGate` that combines the caller's
//! identity, their subscription tier's flag preset and monthly quota, and
//! optional debug overrides. Summaries of large analyses are produced by
//! splitting them along CSI divisions, summarizing each part and merging the
//! pieces under a hard character cap.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
