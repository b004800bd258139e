//! Client-side error taxonomy.
//!
//! Every variant is recoverable: managers convert them into a status message
//! and hand the typed error back to the caller. Nothing here is retried.

use thiserror::Error;

use gearbook_auth::{AuthzError, MalformedTokenError, StorageError};

/// The authentication endpoint refused the credentials or could not be reached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthenticationError {
    /// HTTP status, absent on transport failure.
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    MalformedToken(#[from] MalformedTokenError),

    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

/// A resource request failed: transport error, non-2xx, or unreadable body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    /// HTTP status, absent on transport failure.
    pub status: Option<u16>,
    /// Server-supplied message when the body carried one, else a fallback.
    pub message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The server rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// Failure of a `ResourceManager` operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),
}

impl OperationError {
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            OperationError::Fetch(err) => Some(err),
            OperationError::Forbidden(_) => None,
        }
    }
}
