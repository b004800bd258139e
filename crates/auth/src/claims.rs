//! Session token codec.
//!
//! Tokens are three dot-separated base64 segments (`header.payload.signature`).
//! The client treats them as opaque credentials: the signature is never
//! checked here. Decoding only exists to read claims for display and UI gating.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claim carrying the privilege flag in tokens issued by the backend.
pub const DEFAULT_PRIVILEGE_CLAIM: &str = "administrador";

/// Which token segment failed to decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
}

impl core::fmt::Display for Segment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Segment::Header => f.write_str("header"),
            Segment::Payload => f.write_str("payload"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedTokenError {
    #[error("malformed token: expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("malformed token: {0} segment is not valid base64")]
    Encoding(Segment),

    #[error("malformed token: {0} segment is not a JSON object")]
    NotAnObject(Segment),
}

/// Decoded token payload: claim name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether the named claim is present and truthy.
    ///
    /// Absent, JSON `null`, `false`, `0`, and the strings `""`, `"0"`,
    /// `"false"` and `"null"` all read as unprivileged.
    pub fn is_privileged(&self, claim: &str) -> bool {
        self.get(claim).is_some_and(is_truthy)
    }

    /// `sub` claim, when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// `exp` claim as a timestamp (seconds since the epoch).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.get("exp")?;
        let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Display helper only; the server remains the authority on expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| now >= exp)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false" | "null"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode the claims embedded in `token`.
///
/// Pure: no I/O, no signature verification.
pub fn decode_claims(token: &str) -> Result<Claims, MalformedTokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(MalformedTokenError::SegmentCount(segments.len()));
    }

    decode_object(segments[0], Segment::Header)?;
    let payload = decode_object(segments[1], Segment::Payload)?;
    Ok(Claims(payload))
}

/// Encode `claims` into an unsigned token (`alg: none`, empty signature).
pub fn encode_claims(claims: &Claims) -> String {
    let header = serde_json::json!({ "alg": "none", "typ": "JWT" }).to_string();
    let payload = Value::Object(claims.0.clone()).to_string();
    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

fn decode_object(segment: &str, which: Segment) -> Result<Map<String, Value>, MalformedTokenError> {
    // Tolerate both the URL-safe alphabet and padded standard base64.
    let trimmed = segment.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|_| MalformedTokenError::Encoding(which))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(MalformedTokenError::NotAnObject(which)),
    }
}
