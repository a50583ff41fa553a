//! Billing webhook error types.
//!
//! Every failure mode of signature checking, payload parsing and tier
//! application, with HTTP status mapping and retry semantics.

use http::StatusCode;
use thiserror::Error;

/// Errors that occur during billing webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signing is not configured on this deployment.
    #[error("Webhook secret not configured")]
    NotConfigured,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required metadata field missing from the subscription.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Tier directory write failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl WebhookError {
    /// Returns true if the billing provider should retry delivery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::StorageError(_))
    }

    /// Maps the error to an HTTP status code.
    ///
    /// 2xx acknowledges the event, 4xx stops redelivery, 5xx asks for a retry.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingMetadata(_) => StatusCode::BAD_REQUEST,

            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            WebhookError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
