//! API gating: authentication, feature flags and monthly quotas.

mod api_gate;
mod error;

pub use api_gate::{ApiGate, GateContext, GateOptions, GateRequest, TierStanding};
pub use error::{GateError, GateErrorBody};
