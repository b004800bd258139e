//! Small helpers shared by the session store and the resource clients.

use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;

use crate::AuthScheme;

/// Error body shape used by the backend: `{ "Mensaje": "..." }`.
#[derive(Debug, Deserialize)]
struct ServerMessage {
    #[serde(rename = "Mensaje")]
    mensaje: Option<String>,
}

/// Consume `response` and return the server-supplied message, if any.
pub(crate) async fn server_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    let body: ServerMessage = serde_json::from_slice(&bytes).ok()?;
    body.mensaje.filter(|m| !m.trim().is_empty())
}

/// Attach the session token, when there is one.
pub(crate) fn with_token(request: RequestBuilder, scheme: AuthScheme, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, scheme.header_value(token)),
        None => request,
    }
}
