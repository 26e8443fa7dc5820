//! Compact session credential codec.
//!
//! A credential is three dot-separated, unpadded base64url segments, each a
//! small JSON object: `header.payload.signature`. The payload carries the
//! subject id, issued-at and expiry (whole seconds) and a format version.
//!
//! The signature segment is a digest of a fixed local salt and the subject id.
//! Anyone can recompute it, so it detects accidental corruption or a swapped
//! subject but does not prove authenticity. The credential is bookkeeping for
//! the local session record; the identity provider's own session is what
//! authorizes requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::session::config::CREDENTIAL_VALIDITY;
use crate::session::errors::SessionError;
use crate::utils::{base64url_decode, base64url_encode};

const TOKEN_VERSION: u32 = 1;
const TOKEN_TYPE: &str = "session";
const TOKEN_ALGORITHM: &str = "local";
const SIGNATURE_SALT: &str = "coparent-local-session";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub subject_id: String,
    /// Seconds since epoch
    pub issued_at: i64,
    /// Seconds since epoch
    pub expires_at: i64,
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenSignature {
    sig: String,
}

/// Result of decoding a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub valid: bool,
    pub claims: Option<TokenClaims>,
}

impl TokenStatus {
    pub(crate) fn invalid() -> Self {
        Self {
            valid: false,
            claims: None,
        }
    }
}

/// Issue a credential for `subject_id`, valid for 30 days from now.
pub fn encode(subject_id: &str) -> Result<String, SessionError> {
    encode_at(subject_id, Utc::now())
}

/// Issue a credential as of `now`. Sub-second precision is dropped.
pub fn encode_at(subject_id: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
    if subject_id.is_empty() {
        return Err(SessionError::Token("Subject id must not be empty".to_string()));
    }

    let issued_at = now.timestamp();
    let header = TokenHeader {
        alg: TOKEN_ALGORITHM.to_string(),
        typ: TOKEN_TYPE.to_string(),
    };
    let claims = TokenClaims {
        subject_id: subject_id.to_string(),
        issued_at,
        expires_at: issued_at + CREDENTIAL_VALIDITY.num_seconds(),
        version: TOKEN_VERSION,
    };
    let signature = TokenSignature {
        sig: local_signature(subject_id),
    };

    Ok(format!(
        "{}.{}.{}",
        encode_segment(&header)?,
        encode_segment(&claims)?,
        encode_segment(&signature)?
    ))
}

/// Check a credential against the current time. Never fails: anything that
/// does not decode cleanly is reported as invalid.
pub fn decode(credential: &str) -> TokenStatus {
    decode_at(credential, Utc::now())
}

/// Check a credential against `now`. A credential whose expiry is at or before
/// `now` is invalid.
pub fn decode_at(credential: &str, now: DateTime<Utc>) -> TokenStatus {
    let segments: Vec<&str> = credential.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        tracing::debug!(segments = segments.len(), "Credential is not three segments");
        return TokenStatus::invalid();
    };

    let claims = match base64url_decode(payload)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<TokenClaims>(&bytes).ok())
    {
        Some(claims) => claims,
        None => {
            tracing::debug!("Credential payload is not decodable");
            return TokenStatus::invalid();
        }
    };

    if claims.expires_at <= now.timestamp() {
        tracing::debug!(expires_at = claims.expires_at, "Credential has expired");
        return TokenStatus::invalid();
    }

    TokenStatus {
        valid: true,
        claims: Some(claims),
    }
}

fn local_signature(subject_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SIGNATURE_SALT.as_bytes());
    hasher.update(b":");
    hasher.update(subject_id.as_bytes());
    base64url_encode(&hasher.finalize())
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, SessionError> {
    let json = serde_json::to_vec(value).map_err(|e| SessionError::Token(e.to_string()))?;
    Ok(base64url_encode(&json))
}
