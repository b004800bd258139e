//! Session and credential value types.

use serde::{Deserialize, Serialize};

use crate::claims::{MalformedTokenError, decode_claims};

/// Authentication state as seen by the client.
///
/// `is_privileged` is derived once, at login, from the token claims and is a
/// UX convenience only: the server must re-authorize every mutating call.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub is_privileged: bool,
}

impl Session {
    /// The unauthenticated session (no token, unprivileged).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, is_privileged: bool) -> Self {
        Self {
            token: Some(token.into()),
            is_privileged,
        }
    }

    /// Build a session from a freshly issued token, reading the privilege claim.
    pub fn from_token(token: impl Into<String>, privilege_claim: &str) -> Result<Self, MalformedTokenError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        let is_privileged = claims.is_privileged(privilege_claim);
        Ok(Self::authenticated(token, is_privileged))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_privileged", &self.is_privileged)
            .finish()
    }
}

/// Username/password pair for a single login attempt. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
