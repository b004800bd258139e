//! Client configuration.

use std::path::PathBuf;

use anyhow::Context;

/// Address of the backend when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// How the session token is presented in the `Authorization` header.
///
/// The backend has historically accepted both forms depending on the route;
/// `Bearer` is the standard and the default. `Raw` is kept for backends that
/// still expect the bare token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    Raw,
}

impl AuthScheme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" => Some(AuthScheme::Bearer),
            "raw" => Some(AuthScheme::Raw),
            _ => None,
        }
    }

    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::Raw => token.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without trailing slash.
    pub base_url: String,
    pub auth_scheme: AuthScheme,
    /// Token claim holding the privilege flag.
    pub privilege_claim: String,
    /// Where the binary keeps the durable session.
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            auth_scheme: AuthScheme::default(),
            privilege_claim: gearbook_auth::DEFAULT_PRIVILEGE_CLAIM.to_string(),
            session_file: fallback_session_file(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Read `GEARBOOK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup; unset or invalid values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("GEARBOOK_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = normalize_base_url(url);
        }

        if let Some(raw) = lookup("GEARBOOK_AUTH_SCHEME") {
            match AuthScheme::parse(&raw) {
                Some(scheme) => config.auth_scheme = scheme,
                None => tracing::warn!(
                    value = %raw,
                    "GEARBOOK_AUTH_SCHEME must be 'bearer' or 'raw'; using bearer"
                ),
            }
        }

        if let Some(claim) = lookup("GEARBOOK_PRIVILEGE_CLAIM").filter(|v| !v.trim().is_empty()) {
            config.privilege_claim = claim.trim().to_string();
        }

        if let Some(path) = lookup("GEARBOOK_SESSION_FILE").filter(|v| !v.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }

        config
    }

    /// Absolute URL for a backend path (`/marca_list`, ...).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn fallback_session_file() -> PathBuf {
    match session_file_path() {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!("{err:#}; keeping the session in the working directory");
            PathBuf::from(".gearbook-session.json")
        }
    }
}

fn session_file_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("gearbook");
    path.push("session.json");
    Ok(path)
}
