//! Usage handlers (development tooling).
//!
//! ## Queries
//! - Current month's usage report
//!
//! ## Commands
//! - Reset the current month's counter

mod get_usage_status;
mod reset_usage;

pub use get_usage_status::{GetUsageStatusHandler, GetUsageStatusQuery};
pub use reset_usage::{ResetUsageCommand, ResetUsageError, ResetUsageHandler};
