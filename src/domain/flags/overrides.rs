//! Debug flag overrides.
//!
//! An override is a base64-encoded JSON object carried in the `x-ff` header
//! or the `ff` cookie. Two payload shapes are accepted:
//!
//! - a bare partial flag map: `{"aiSummary":true}`
//! - an envelope with an issue time: `{"flags":{...},"issuedAt":1735689600}`
//!
//! When a signing secret is configured the encoded payload must be followed
//! by `.` and the hex HMAC-SHA256 of the encoded payload. Envelopes older than
//! the source's max age are rejected.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Duration;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::PartialFlags;
use crate::domain::foundation::Timestamp;

/// Header carrying a server-originated override.
pub const OVERRIDE_HEADER: &str = "x-ff";

/// Cookie carrying a client-originated override.
pub const OVERRIDE_COOKIE: &str = "ff";

/// Allowed clock skew for envelopes issued "in the future".
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Where an override came from. Each source has its own max age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
    Header,
    Cookie,
}

impl OverrideSource {
    /// How long an envelope from this source stays valid.
    pub fn max_age(&self) -> Duration {
        match self {
            OverrideSource::Header => Duration::hours(24),
            OverrideSource::Cookie => Duration::days(7),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OverrideSource::Header => OVERRIDE_HEADER,
            OverrideSource::Cookie => OVERRIDE_COOKIE,
        }
    }
}

/// Why an override payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("override payload is empty")]
    Empty,

    #[error("override is not valid base64: {0}")]
    Encoding(String),

    #[error("override payload does not match the flag shape: {0}")]
    Payload(String),

    #[error("override signature is missing")]
    MissingSignature,

    #[error("override signature does not match")]
    InvalidSignature,

    #[error("override expired {age_secs}s after issue (max {max_age_secs}s)")]
    Expired { age_secs: i64, max_age_secs: i64 },

    #[error("override issue time is in the future")]
    IssuedInFuture,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OverrideEnvelope {
    flags: PartialFlags,
    issued_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OverridePayload {
    Envelope(OverrideEnvelope),
    Bare(PartialFlags),
}

/// Encodes and decodes override payloads, optionally signed.
#[derive(Clone, Default)]
pub struct OverrideCodec {
    signing_secret: Option<Secret<String>>,
}

impl std::fmt::Debug for OverrideCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideCodec")
            .field("signed", &self.signing_secret.is_some())
            .finish()
    }
}

impl OverrideCodec {
    /// Codec that accepts unsigned payloads.
    pub fn unsigned() -> Self {
        Self::default()
    }

    /// Codec that requires every payload to carry a valid signature.
    pub fn signed(secret: Secret<String>) -> Self {
        Self {
            signing_secret: Some(secret),
        }
    }

    pub fn requires_signature(&self) -> bool {
        self.signing_secret.is_some()
    }

    /// Decodes an override as seen at `now`.
    pub fn decode(
        &self,
        raw: &str,
        source: OverrideSource,
        now: Timestamp,
    ) -> Result<PartialFlags, OverrideError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(OverrideError::Empty);
        }

        let encoded = match &self.signing_secret {
            Some(secret) => {
                let (encoded, signature) =
                    raw.rsplit_once('.').ok_or(OverrideError::MissingSignature)?;
                let signature =
                    hex::decode(signature).map_err(|_| OverrideError::InvalidSignature)?;
                let expected = sign(secret, encoded);
                if !bool::from(expected.as_slice().ct_eq(&signature)) {
                    return Err(OverrideError::InvalidSignature);
                }
                encoded
            }
            None => raw,
        };

        let json = BASE64
            .decode(encoded)
            .map_err(|e| OverrideError::Encoding(e.to_string()))?;

        match serde_json::from_slice::<OverridePayload>(&json)
            .map_err(|e| OverrideError::Payload(e.to_string()))?
        {
            OverridePayload::Bare(flags) => Ok(flags),
            OverridePayload::Envelope(envelope) => {
                let age_secs = now.as_unix_secs() - envelope.issued_at;
                let max_age_secs = source.max_age().num_seconds();
                if age_secs < -MAX_CLOCK_SKEW_SECS {
                    return Err(OverrideError::IssuedInFuture);
                }
                if age_secs > max_age_secs {
                    return Err(OverrideError::Expired {
                        age_secs,
                        max_age_secs,
                    });
                }
                Ok(envelope.flags)
            }
        }
    }

    /// Encodes `flags` as an envelope issued at `issued_at`, signed when a
    /// secret is configured.
    pub fn encode(&self, flags: &PartialFlags, issued_at: Timestamp) -> Result<String, OverrideError> {
        let envelope = OverrideEnvelope {
            flags: *flags,
            issued_at: issued_at.as_unix_secs(),
        };
        let json =
            serde_json::to_vec(&envelope).map_err(|e| OverrideError::Payload(e.to_string()))?;
        let encoded = BASE64.encode(json);

        Ok(match &self.signing_secret {
            Some(secret) => format!("{}.{}", encoded, hex::encode(sign(secret, &encoded))),
            None => encoded,
        })
    }
}

fn sign(secret: &Secret<String>, encoded: &str) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts any key");
    mac.update(encoded.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
