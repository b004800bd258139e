//! Typed HTTP gateway for one resource kind.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use gearbook_core::{ListEnvelope, RecordId, Resource, ResourceKind};

use crate::error::FetchError;
use crate::http::{server_message, with_token};
use crate::{AuthScheme, ClientConfig, SessionStore};

/// List/create/update/delete for the resource `R`.
///
/// Every request carries the session token read from the [`SessionStore`] at
/// send time. One attempt per call; failures come back as [`FetchError`].
pub struct ResourceClient<R: Resource> {
    http: reqwest::Client,
    base_url: String,
    scheme: AuthScheme,
    session: Arc<SessionStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Self {
        Self::with_http(config, session, reqwest::Client::new())
    }

    pub fn with_http(config: &ClientConfig, session: Arc<SessionStore>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            scheme: config.auth_scheme,
            session,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub async fn list(&self) -> Result<Vec<R::Record>, FetchError> {
        let kind = R::KIND;
        let fallback = format!("Unknown error fetching {}.", kind.plural);
        let response = self
            .send(self.request(Method::GET, kind.list_path), &fallback)
            .await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::transport(format!("unreadable {} list: {e}", kind.noun())))?;

        let items = match kind.list_envelope {
            ListEnvelope::Bare => body,
            ListEnvelope::Keyed(key) => match body {
                Value::Object(mut map) => map.remove(key).ok_or_else(|| {
                    FetchError::transport(format!("{} list response has no '{key}' field", kind.noun()))
                })?,
                _ => {
                    return Err(FetchError::transport(format!(
                        "{} list response is not a JSON object",
                        kind.noun()
                    )));
                }
            },
        };

        serde_json::from_value(items)
            .map_err(|e| FetchError::transport(format!("unreadable {} list: {e}", kind.noun())))
    }

    pub async fn create(&self, fields: &R::Fields) -> Result<(), FetchError> {
        let kind = R::KIND;
        let fallback = format!("Unknown error saving {}.", kind.noun());
        let request = self.request(Method::POST, &kind.create_path()).json(fields);
        self.send(request, &fallback).await?;
        Ok(())
    }

    pub async fn update(&self, id: RecordId, fields: &R::Fields) -> Result<(), FetchError> {
        let kind = R::KIND;
        let fallback = format!("Unknown error saving {}.", kind.noun());
        let request = self.request(Method::PUT, &kind.update_path(id)).json(fields);
        self.send(request, &fallback).await?;
        Ok(())
    }

    /// Delete record `id`.
    ///
    /// Returns the server's confirmation message when the response carries one.
    pub async fn delete(&self, id: RecordId) -> Result<Option<String>, FetchError> {
        let kind = R::KIND;
        let fallback = format!("Unknown error deleting {}.", kind.noun());
        let response = self
            .send(self.request(Method::DELETE, &kind.delete_path(id)), &fallback)
            .await?;
        Ok(server_message(response).await)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "resource request");
        let session = self.session.current();
        with_token(self.http.request(method, url), self.scheme, session.token())
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Response, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = server_message(response)
            .await
            .unwrap_or_else(|| fallback.to_string());
        let err = FetchError::http(status.as_u16(), message);

        if err.is_unauthorized() {
            self.session.invalidate();
        }
        Err(err)
    }
}
