//! HTTP error mapping.
//!
//! Every failure leaves as JSON with a machine-readable `reason`. Gate
//! refusals keep the gate's own body; everything else uses
//! [`ErrorResponse`]. Internal details are only attached when verbose errors
//! are enabled, which configuration never allows in production.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::handlers::{AnalyzeDocumentError, ResetUsageError, SummarizeAnalysisError};
use crate::domain::gate::GateError;
use crate::domain::membership::WebhookError;
use crate::ports::TierDirectoryError;

/// JSON body for non-gate errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub reason: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// What went wrong, before it is rendered.
#[derive(Debug)]
pub enum ApiErrorKind {
    Gate(GateError),
    /// The request itself is unusable; the message is shown to the caller.
    BadRequest(String),
    /// The LLM failed or answered with something unusable.
    Upstream(String),
    /// A dependency is missing or unreachable.
    Unavailable(String),
    Webhook(WebhookError),
    Internal(String),
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    verbose: bool,
}

impl ApiError {
    pub fn new(kind: impl Into<ApiErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            verbose: false,
        }
    }

    /// Attach internal details to the response body.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::Gate(e) => e.status(),
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiErrorKind::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorKind::Webhook(e) => e.status_code(),
            ApiErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (reason, message, detail) = match &self.kind {
            ApiErrorKind::Gate(e) => (e.reason_code(), e.to_string(), None),
            ApiErrorKind::BadRequest(message) => ("invalid_request", message.clone(), None),
            ApiErrorKind::Upstream(detail) => (
                "upstream_error",
                "The analysis service returned an unusable response".to_string(),
                Some(detail.clone()),
            ),
            ApiErrorKind::Unavailable(detail) => (
                "service_unavailable",
                "A required service is not available".to_string(),
                Some(detail.clone()),
            ),
            ApiErrorKind::Webhook(e) => (webhook_reason(e), e.to_string(), None),
            ApiErrorKind::Internal(detail) => (
                "internal_error",
                "An unexpected error occurred".to_string(),
                Some(detail.clone()),
            ),
        };

        let body = ErrorResponse::new(reason, message);
        match detail {
            Some(detail) if self.verbose => body.with_detail(detail),
            _ => body,
        }
    }
}

fn webhook_reason(error: &WebhookError) -> &'static str {
    match error {
        WebhookError::NotConfigured => "webhook_not_configured",
        WebhookError::InvalidSignature => "invalid_signature",
        WebhookError::TimestampOutOfRange | WebhookError::InvalidTimestamp => "invalid_timestamp",
        WebhookError::ParseError(_) | WebhookError::MissingMetadata(_) => "invalid_payload",
        WebhookError::Ignored(_) => "ignored",
        WebhookError::StorageError(_) => "storage_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.kind {
            ApiErrorKind::Gate(e) => (status, Json(e.body())).into_response(),
            kind => {
                if status.is_server_error() {
                    tracing::error!(status = %status, error = ?kind, "Request failed");
                }
                (status, Json(self.body())).into_response()
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<GateError> for ApiErrorKind {
    fn from(e: GateError) -> Self {
        ApiErrorKind::Gate(e)
    }
}

impl From<WebhookError> for ApiErrorKind {
    fn from(e: WebhookError) -> Self {
        ApiErrorKind::Webhook(e)
    }
}

impl From<JsonRejection> for ApiErrorKind {
    fn from(e: JsonRejection) -> Self {
        ApiErrorKind::BadRequest(e.body_text())
    }
}

impl From<SummarizeAnalysisError> for ApiErrorKind {
    fn from(e: SummarizeAnalysisError) -> Self {
        match e {
            SummarizeAnalysisError::ProviderNotConfigured => {
                ApiErrorKind::Unavailable(e.to_string())
            }
            SummarizeAnalysisError::MaxCharsOutOfRange { .. } => {
                ApiErrorKind::BadRequest(e.to_string())
            }
        }
    }
}

impl From<AnalyzeDocumentError> for ApiErrorKind {
    fn from(e: AnalyzeDocumentError) -> Self {
        match e {
            AnalyzeDocumentError::ProviderNotConfigured => ApiErrorKind::Unavailable(e.to_string()),
            AnalyzeDocumentError::EmptyDocument => ApiErrorKind::BadRequest(e.to_string()),
            AnalyzeDocumentError::Upstream(_) | AnalyzeDocumentError::Malformed(_) => {
                ApiErrorKind::Upstream(e.to_string())
            }
        }
    }
}

impl From<ResetUsageError> for ApiErrorKind {
    fn from(e: ResetUsageError) -> Self {
        ApiErrorKind::Unavailable(e.to_string())
    }
}

impl From<TierDirectoryError> for ApiErrorKind {
    fn from(e: TierDirectoryError) -> Self {
        ApiErrorKind::Unavailable(e.to_string())
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ApiErrorKind>,
{
    fn from(e: E) -> Self {
        ApiError::new(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flags::Flag;
    use crate::ports::AIError;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn gate_error_keeps_gate_body() {
        let (status, body) = body_json(ApiError::new(GateError::FeatureDisabled {
            feature: Flag::AiSummary,
        }))
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["reason"], "feature_disabled");
        assert_eq!(body["feature"], "aiSummary");
    }

    #[tokio::test]
    async fn upstream_failure_is_502_without_detail_by_default() {
        let error = ApiError::new(AnalyzeDocumentError::Upstream(AIError::network("reset by peer")));

        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["reason"], "upstream_error");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn verbose_error_includes_detail() {
        let error = ApiError::new(AnalyzeDocumentError::Malformed("missing csi_divisions".into()))
            .verbose(true);

        let (_, body) = body_json(error).await;

        assert!(body["detail"].as_str().unwrap().contains("missing csi_divisions"));
    }

    #[tokio::test]
    async fn validation_is_400_with_message() {
        let error = ApiError::new(SummarizeAnalysisError::MaxCharsOutOfRange {
            value: 10,
            min: 500,
            max: 50_000,
        });

        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "invalid_request");
        assert!(body["message"].as_str().unwrap().contains("between 500 and 50000"));
    }

    #[tokio::test]
    async fn missing_provider_is_503() {
        let (status, body) = body_json(ApiError::new(SummarizeAnalysisError::ProviderNotConfigured)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["reason"], "service_unavailable");
    }

    #[tokio::test]
    async fn bad_webhook_signature_is_401() {
        let (status, body) = body_json(ApiError::new(WebhookError::InvalidSignature)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "invalid_signature");
    }
}
