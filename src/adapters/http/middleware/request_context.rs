//! What a gated handler needs to know about the caller.

use axum::http::request::Parts;

use super::overrides::FlagOverrides;
use crate::domain::flags::PartialFlags;
use crate::domain::foundation::{AuthenticatedUser, TraceId, UserId};
use crate::domain::gate::GateRequest;
use crate::ports::RequestMetadata;

/// Header set by the request-id layer and echoed on the response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identity, override and trace id of the current request.
///
/// Never rejects: a request without a user is anonymous and the gate decides
/// whether that is acceptable.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: Option<AuthenticatedUser>,
    pub overrides: Option<PartialFlags>,
    pub trace_id: TraceId,
}

impl RequestContext {
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    pub fn gate_request(&self) -> GateRequest {
        GateRequest {
            user_id: self.user_id().cloned(),
            overrides: self.overrides,
        }
    }

    pub fn metadata(&self) -> RequestMetadata {
        RequestMetadata::new(self.user_id().cloned(), self.trace_id.clone())
    }

    fn from_parts(parts: &Parts) -> Self {
        let trace_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(TraceId::from_string)
            .unwrap_or_default();

        Self {
            user: parts.extensions.get::<AuthenticatedUser>().cloned(),
            overrides: parts.extensions.get::<FlagOverrides>().map(|o| o.0),
            trace_id,
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let context = Self::from_parts(parts);
        Box::pin(async move { Ok(context) })
    }
}
