//! Gate refusals and their wire shape.

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::domain::flags::Flag;
use crate::domain::membership::Tier;

/// Why the gate refused a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Feature '{feature}' is not enabled for this account")]
    FeatureDisabled { feature: Flag },

    #[error("Monthly analysis limit of {limit} reached on the {tier} plan")]
    LimitExceeded { tier: Tier, limit: u32, used: u64 },
}

/// JSON body of a refused request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateErrorBody {
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<&'static str>,
    pub message: String,
}

impl GateError {
    /// Machine-readable reason the client keys upgrade prompts off.
    pub fn reason_code(&self) -> &'static str {
        match self {
            GateError::AuthenticationRequired => "authentication_required",
            GateError::FeatureDisabled { .. } => "feature_disabled",
            GateError::LimitExceeded { .. } => "limit_exceeded",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GateError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            GateError::FeatureDisabled { .. } | GateError::LimitExceeded { .. } => {
                StatusCode::FORBIDDEN
            }
        }
    }

    pub fn feature(&self) -> Option<Flag> {
        match self {
            GateError::FeatureDisabled { feature } => Some(*feature),
            _ => None,
        }
    }

    pub fn body(&self) -> GateErrorBody {
        GateErrorBody {
            reason: self.reason_code(),
            feature: self.feature().map(|f| f.as_str()),
            message: self.to_string(),
        }
    }
}
