//! Unverified access-token payload decoding
//!
//! The client never verifies token signatures; it only peeks at the payload
//! segment to show who is signed in. The server stays the authority.

use crate::error::TokenError;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Serialize;
use serde_json::{Map, Value};

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Accepts both padded and unpadded input
const URL_SAFE_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);
const STANDARD_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserClaims(Map<String, Value>);

impl UserClaims {
    /// Raw claim by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `sub`: the user id
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// `type`: `access` for access tokens
    pub fn token_type(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    /// `exp` as a unix timestamp
    pub fn expires_at(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }

    /// `iat` as a unix timestamp
    pub fn issued_at(&self) -> Option<i64> {
        self.get("iat").and_then(Value::as_i64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Decode the payload of a `header.payload.signature` token
///
/// # Errors
///
/// Fails when the token does not have exactly three segments, or the
/// payload is not base64-encoded JSON object text.
pub fn decode_claims(token: &str) -> Result<UserClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(TokenError::SegmentCount(segments.len()));
    };

    // JWTs use the URL-safe alphabet; plain base64 payloads are accepted too
    let bytes = URL_SAFE_ENGINE
        .decode(payload)
        .or_else(|_| STANDARD_ENGINE.decode(payload))?;
    match serde_json::from_slice(&bytes)? {
        Value::Object(map) => Ok(UserClaims(map)),
        _ => Err(TokenError::NotAnObject),
    }
}
