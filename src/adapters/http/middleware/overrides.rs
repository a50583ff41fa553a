//! Debug flag overrides carried by the request.
//!
//! The `x-ff` header wins over the `ff` cookie. Decoding is delegated to the
//! resolver, which drops anything malformed, expired or unsigned and is a
//! no-op when the override channel is disabled.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::domain::flags::{
    FlagResolver, OverrideSource, PartialFlags, OVERRIDE_COOKIE, OVERRIDE_HEADER,
};

/// Decoded override, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOverrides(pub PartialFlags);

pub async fn override_middleware(
    State(resolver): State<Arc<FlagResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    if resolver.overrides_enabled() {
        if let Some(flags) = decode_from_headers(&resolver, request.headers()) {
            request.extensions_mut().insert(FlagOverrides(flags));
        }
    }
    next.run(request).await
}

fn decode_from_headers(resolver: &FlagResolver, headers: &HeaderMap) -> Option<PartialFlags> {
    if let Some(raw) = headers.get(OVERRIDE_HEADER).and_then(|v| v.to_str().ok()) {
        return resolver.decode_override(raw.trim(), OverrideSource::Header);
    }

    let raw = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, OVERRIDE_COOKIE))?;
    resolver.decode_override(raw, OverrideSource::Cookie)
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.trim_matches('"'))
    })
}
