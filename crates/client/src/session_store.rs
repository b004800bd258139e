//! Session custody: credential exchange plus durable session state.

use std::sync::Arc;

use serde::Deserialize;

use gearbook_auth::storage::{clear_session, load_session, persist_session};
use gearbook_auth::{Credentials, Session, SessionStorage, StorageError};

use crate::error::{AuthenticationError, LoginError};
use crate::http::server_message;
use crate::ClientConfig;

const LOGIN_PATH: &str = "/login";
const LOGIN_REJECTED: &str = "Login failed. Check your credentials.";
const LOGIN_UNREACHABLE: &str = "An error occurred during login.";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// Owner of the process-wide session.
///
/// The store never caches the session in memory: `current()` re-reads the
/// durable storage every time, so a login performed through another handle
/// (another screen, another process sharing the file) is observed at once.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    http: reqwest::Client,
    login_url: String,
    privilege_claim: String,
}

impl SessionStore {
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_http(config, storage, reqwest::Client::new())
    }

    pub fn with_http(config: &ClientConfig, storage: Arc<dyn SessionStorage>, http: reqwest::Client) -> Self {
        Self {
            storage,
            http,
            login_url: config.url(LOGIN_PATH),
            privilege_claim: config.privilege_claim.clone(),
        }
    }

    /// Exchange credentials for a session token and persist the new session.
    ///
    /// Credentials travel as HTTP Basic auth on this request only. On any
    /// failure the previously stored session is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        tracing::info!(username = credentials.username(), "logging in");

        let response = self
            .http
            .post(&self.login_url)
            .basic_auth(credentials.username(), Some(credentials.password()))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("login request failed: {e}");
                AuthenticationError {
                    status: None,
                    message: LOGIN_UNREACHABLE.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = server_message(response)
                .await
                .unwrap_or_else(|| LOGIN_REJECTED.to_string());
            tracing::warn!(status = status.as_u16(), %message, "login rejected");
            return Err(AuthenticationError {
                status: Some(status.as_u16()),
                message,
            }
            .into());
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            tracing::warn!("login response unreadable: {e}");
            AuthenticationError {
                status: Some(status.as_u16()),
                message: LOGIN_UNREACHABLE.to_string(),
            }
        })?;

        let session = Session::from_token(body.token, &self.privilege_claim).map_err(|e| {
            tracing::warn!("login returned an undecodable token: {e}");
            e
        })?;

        persist_session(self.storage.as_ref(), &session)?;
        tracing::info!(privileged = session.is_privileged, "login succeeded");
        Ok(session)
    }

    /// Forget the session. Idempotent.
    pub fn logout(&self) -> Result<(), StorageError> {
        clear_session(self.storage.as_ref())?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Current session, freshly read from storage.
    ///
    /// Unreadable storage is treated as "not logged in".
    pub fn current(&self) -> Session {
        match load_session(self.storage.as_ref()) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("failed to read session storage: {err}");
                Session::anonymous()
            }
        }
    }

    /// Drop a session the server reported as invalid or expired.
    pub fn invalidate(&self) {
        tracing::warn!("server rejected the session token; clearing session");
        if let Err(err) = clear_session(self.storage.as_ref()) {
            tracing::error!("failed to clear rejected session: {err}");
        }
    }
}
